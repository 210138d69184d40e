//! Reconciler for converging current state to desired state.
//!
//! This module implements the four reconciliation strategies. Each one is a
//! pure function of the two snapshots: it compares them in normalized form,
//! chooses the commands, and maps them to wire requests. Deletions always
//! precede updates in both the command list and the request list.

use tracing::{debug, info};

use crate::config::{ConfigHasher, ConfigValidator, KeyedList, MstpConfig, StpConfig, VlanConfig};
use crate::error::Result;
use crate::planner::normalize::strip_field_defaults;
use crate::planner::{Command, ConfigNode, DiffEngine, Operation, ReconcilePlan, apply, normalize};
use crate::request::{
    DeleteRequestBuilder, ModifyRequestBuilder, PerVlanFamily, WireRequest, interface_delete,
    mst_instance_delete, mstp_containers_delete, vlan_entity_deletes,
};

/// Reconciles a desired snapshot against the current one.
#[derive(Debug)]
pub struct Reconciler<'a> {
    /// Desired snapshot.
    want: &'a StpConfig,
    /// Current snapshot.
    have: &'a StpConfig,
    /// Configuration hasher.
    hasher: ConfigHasher,
    /// Diff engine.
    diff_engine: DiffEngine,
    /// Snapshot validator.
    validator: ConfigValidator,
}

/// Deletions chosen by the replaced strategy before its residual merge.
#[derive(Debug, Default)]
struct Replacement {
    deleted: StpConfig,
    requests: Vec<WireRequest>,
}

impl<'a> Reconciler<'a> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(want: &'a StpConfig, have: &'a StpConfig) -> Self {
        Self {
            want,
            have,
            hasher: ConfigHasher::new(),
            diff_engine: DiffEngine::new(),
            validator: ConfigValidator::new(),
        }
    }

    /// Computes the plan for `mode`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `want` is rejected (merged, replaced and
    /// overridden only), or a serialization error if a payload cannot be
    /// encoded.
    pub fn reconcile(&self, mode: Operation) -> Result<ReconcilePlan> {
        info!("Starting reconciliation (state: {mode})");

        let want_hash = self.hasher.hash_config(&normalize(self.want))?;
        let have_hash = self.hasher.hash_config(&normalize(self.have))?;
        let mut plan = ReconcilePlan::empty(mode, want_hash, have_hash);

        let (commands, requests) = match mode {
            Operation::Merged => self.merged()?,
            Operation::Replaced => self.replaced()?,
            Operation::Overridden => self.overridden()?,
            Operation::Deleted => self.deleted(),
        };
        plan.commands = commands;
        plan.requests = requests;

        if plan.is_empty() {
            info!("No changes required");
        } else {
            info!(
                "Planned {} commands, {} requests ({} delete, {} modify)",
                plan.commands.len(),
                plan.requests.len(),
                plan.delete_count(),
                plan.modify_count()
            );
        }
        Ok(plan)
    }

    /// Predicts the normalized state after the plan for `mode` is applied.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Reconciler::reconcile`].
    pub fn preview(&self, mode: Operation) -> Result<StpConfig> {
        let plan = self.reconcile(mode)?;
        let predicted = apply(&plan.commands, self.have);
        Ok(normalize(&predicted))
    }

    /// Commands the minimal patch making `have` a superset of `want`.
    fn merged(&self) -> Result<(Vec<Command>, Vec<WireRequest>)> {
        self.validator.validate(self.want, self.have)?;

        let delta = self.diff_engine.compute_diff(self.want, self.have);
        let requests = ModifyRequestBuilder::new(self.have).build(&delta)?;
        Ok((
            Command::non_empty(Operation::Merged, delta).into_iter().collect(),
            requests,
        ))
    }

    /// Deletes what `want` names and `have` holds with the same value.
    fn deleted(&self) -> (Vec<Command>, Vec<WireRequest>) {
        if self.want.is_empty() {
            let current = normalize(self.have);
            if current.is_empty() {
                debug!("Nothing configured; nothing to delete");
                return (Vec::new(), Vec::new());
            }
            return (
                vec![Command::new(Operation::Deleted, current)],
                vec![DeleteRequestBuilder::delete_all()],
            );
        }

        let targets = normalize(self.want);
        let (pruned, requests) = DeleteRequestBuilder::new(self.have).build(&targets);
        (
            Command::non_empty(Operation::Deleted, pruned).into_iter().collect(),
            requests,
        )
    }

    /// Makes `have` equal to `want`, resetting the device when `have`
    /// holds anything `want` does not ask for.
    fn overridden(&self) -> Result<(Vec<Command>, Vec<WireRequest>)> {
        self.validator.validate(self.want, self.have)?;

        let want = normalize(self.want);
        let have = normalize(self.have);
        let extra = self.diff_engine.compute_diff(&have, &want);

        if extra.is_bare() {
            let delta = self.diff_engine.compute_diff(&want, &have);
            let requests = ModifyRequestBuilder::new(self.have).build(&delta)?;
            return Ok((
                Command::non_empty(Operation::Overridden, delta).into_iter().collect(),
                requests,
            ));
        }

        debug!("Current configuration holds entries not requested; resetting");
        let empty = StpConfig::new();
        let mut requests = vec![DeleteRequestBuilder::delete_all()];
        requests.extend(ModifyRequestBuilder::new(&empty).build(&want)?);

        let commands = [
            Command::non_empty(Operation::Deleted, have),
            Command::non_empty(Operation::Overridden, want),
        ]
        .into_iter()
        .flatten()
        .collect();
        Ok((commands, requests))
    }

    /// Replaces each differing entity of `have` with `want`'s version.
    fn replaced(&self) -> Result<(Vec<Command>, Vec<WireRequest>)> {
        self.validator.validate(self.want, self.have)?;

        // Entities are matched with restated defaults kept as absent fields,
        // so restating a default still replaces a non-default value.
        let restated = strip_field_defaults(self.want);
        let want = normalize(self.want);
        let have = normalize(self.have);

        let replacement = match (&restated.global, &have.global) {
            (Some(wanted), Some(current)) if wanted != current => {
                debug!("Global settings differ; resetting");
                Replacement {
                    deleted: have.clone(),
                    requests: vec![DeleteRequestBuilder::delete_all()],
                }
            }
            _ => Self::entity_replacement(&restated, &have),
        };

        let mut commands: Vec<Command> =
            Command::non_empty(Operation::Deleted, replacement.deleted).into_iter().collect();
        let post = apply(&commands, &have);

        let residual = self.diff_engine.compute_diff(&want, &post);
        let mut requests = replacement.requests;
        requests.extend(ModifyRequestBuilder::new(&post).build(&residual)?);
        commands.extend(Command::non_empty(Operation::Replaced, residual));

        Ok((commands, requests))
    }

    /// Entity-level deletes for every entry of `have` that `want` restates
    /// differently.
    fn entity_replacement(want: &StpConfig, have: &StpConfig) -> Replacement {
        let mut out = Replacement::default();

        for wanted in want.interfaces.iter() {
            match have.interfaces.get(&wanted.intf_name) {
                Some(current) if current != wanted => {
                    out.requests.push(interface_delete(&wanted.intf_name));
                    out.deleted.interfaces.insert(current.clone());
                }
                _ => {}
            }
        }

        if let (Some(wanted), Some(current)) = (&want.mstp, &have.mstp) {
            if let Some(mstp) = Self::mstp_replacement(wanted, current, &mut out.requests) {
                out.deleted.mstp = Some(mstp);
            }
        }

        out.deleted.pvst =
            Self::vlan_replacement(PerVlanFamily::Pvst, &want.pvst, &have.pvst, &mut out.requests);
        out.deleted.rapid_pvst = Self::vlan_replacement(
            PerVlanFamily::RapidPvst,
            &want.rapid_pvst,
            &have.rapid_pvst,
            &mut out.requests,
        );
        out
    }

    fn mstp_replacement(
        want: &MstpConfig,
        have: &MstpConfig,
        requests: &mut Vec<WireRequest>,
    ) -> Option<MstpConfig> {
        let scalars = |m: &MstpConfig| {
            (
                m.mst_name.clone(),
                m.revision,
                m.max_hop,
                m.hello_time,
                m.max_age,
                m.fwd_delay,
            )
        };
        let sets_scalars = want.mst_name.is_some()
            || want.revision.is_some()
            || want.max_hop.is_some()
            || want.hello_time.is_some()
            || want.max_age.is_some()
            || want.fwd_delay.is_some();

        if sets_scalars && scalars(want) != scalars(have) {
            debug!("MSTP settings differ; clearing MSTP configuration");
            requests.extend(mstp_containers_delete());
            return Some(have.clone());
        }

        let mut deleted = MstpConfig::default();
        for wanted in want.mst_instances.iter() {
            match have.mst_instances.get(&wanted.mst_id) {
                Some(current) if current != wanted => {
                    requests.push(mst_instance_delete(wanted.mst_id));
                    deleted.mst_instances.insert(current.clone());
                }
                _ => {}
            }
        }
        (!deleted.mst_instances.is_empty()).then_some(deleted)
    }

    fn vlan_replacement(
        family: PerVlanFamily,
        want: &KeyedList<VlanConfig>,
        have: &KeyedList<VlanConfig>,
        requests: &mut Vec<WireRequest>,
    ) -> KeyedList<VlanConfig> {
        let mut deleted = KeyedList::new();
        for wanted in want.iter() {
            match have.get(&wanted.vlan_id) {
                Some(current) if current != wanted => {
                    requests.extend(vlan_entity_deletes(family, current));
                    deleted.insert(current.clone());
                }
                _ => {}
            }
        }
        deleted
    }
}

/// Reconciles `want` against `have` in `mode` with a default reconciler.
///
/// # Errors
///
/// Returns the same errors as [`Reconciler::reconcile`].
pub fn reconcile(want: &StpConfig, have: &StpConfig, mode: Operation) -> Result<ReconcilePlan> {
    Reconciler::new(want, have).reconcile(mode)
}
