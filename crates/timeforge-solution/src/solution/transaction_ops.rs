//! Transactions: recording, undo and redo.

use tracing::debug;

use super::Solution;
use crate::error::{Result, SolutionError};
use crate::ids::TransactionId;
use crate::meet::Meet;
use crate::task::Task;
use crate::transaction::{Operation, Transaction};

impl Solution {
    /// Creates an inactive, empty transaction.
    pub fn transaction_make(&mut self) -> TransactionId {
        self.transactions.insert(Transaction::default())
    }

    #[inline]
    pub fn transaction(&self, t: TransactionId) -> &Transaction {
        &self.transactions[t]
    }

    fn live_transaction(&self, t: TransactionId) -> Result<&Transaction> {
        self.transactions
            .get(t)
            .ok_or(SolutionError::NoSuchTransaction(t))
    }

    /// Clears the log of `t` and starts recording into it.
    pub fn transaction_begin(&mut self, t: TransactionId) -> Result<()> {
        if self.live_transaction(t)?.active {
            return Err(SolutionError::TransactionActive(t));
        }
        let transaction = &mut self.transactions[t];
        transaction.operations.clear();
        transaction.active = true;
        self.active_transactions.push(t);
        debug!(event = "transaction_begin", transaction = %t);
        Ok(())
    }

    /// Stops recording into `t`.
    pub fn transaction_end(&mut self, t: TransactionId) -> Result<()> {
        if !self.live_transaction(t)?.active {
            return Err(SolutionError::TransactionInactive(t));
        }
        self.transactions[t].active = false;
        self.active_transactions.retain(|&a| a != t);
        debug!(event = "transaction_end", transaction = %t, operations = self.transactions[t].len());
        Ok(())
    }

    /// Reverses every operation of `t`, last first.
    ///
    /// Objects deleted by the undo reappear in their original slots. Other
    /// active transactions record the reversing operations.
    pub fn transaction_undo(&mut self, t: TransactionId) -> Result<()> {
        if self.live_transaction(t)?.active {
            return Err(SolutionError::TransactionActive(t));
        }
        let operations = self.transactions[t].operations.clone();
        for op in operations.iter().rev() {
            self.apply_operation(&op.inverse());
        }
        debug!(event = "transaction_undo", transaction = %t, operations = operations.len());
        self.after_edit();
        Ok(())
    }

    /// Performs every operation of `t` again, first first.
    pub fn transaction_redo(&mut self, t: TransactionId) -> Result<()> {
        if self.live_transaction(t)?.active {
            return Err(SolutionError::TransactionActive(t));
        }
        let operations = self.transactions[t].operations.clone();
        for op in &operations {
            self.apply_operation(op);
        }
        debug!(event = "transaction_redo", transaction = %t, operations = operations.len());
        self.after_edit();
        Ok(())
    }

    /// Deletes `t`, ending it first if active.
    pub fn transaction_delete(&mut self, t: TransactionId) -> Result<()> {
        if self.live_transaction(t)?.active {
            self.transaction_end(t)?;
        }
        self.transactions.remove(t);
        Ok(())
    }

    fn apply_operation(&mut self, op: &Operation) {
        match op {
            Operation::MeetMake(r) => {
                let mut meet = Meet::new(r.duration, r.domain.clone(), r.event, r.event_offset);
                meet.back_ref = r.back_ref;
                meet.zones = r.zones.clone();
                self.insert_bare_meet(Some(r.meet), meet);
            }
            Operation::MeetDelete(r) => self.delete_bare_meet(r.meet),
            Operation::MeetSplit(r) => {
                self.split_unchecked(r.first, r.at, Some(r));
            }
            Operation::MeetMerge(r) => self.merge_unchecked(r),
            &Operation::MeetAssign {
                meet,
                target,
                offset,
            } => self.assign_unchecked(meet, target, offset),
            &Operation::MeetUnassign {
                meet,
                target,
                offset,
            } => {
                assert_eq!(
                    self.meets[meet].target,
                    Some((target, offset)),
                    "{} is not where the log left it",
                    meet
                );
                self.unassign_unchecked(meet);
            }
            Operation::MeetSetDomain { meet, new, .. } => {
                self.set_domain_unchecked(*meet, new.clone())
            }
            Operation::TaskMake(r) => {
                self.make_task_unchecked(
                    Some(r.task),
                    Task {
                        meet: r.meet,
                        event_resource: r.event_resource,
                        domain: r.domain,
                        resource: None,
                        workload: r.workload,
                    },
                );
            }
            Operation::TaskDelete(r) => self.delete_task_unchecked(r.task),
            &Operation::TaskAssignResource { task, resource } => {
                self.assign_resource_unchecked(task, resource)
            }
            &Operation::TaskUnassignResource { task, resource } => {
                assert_eq!(self.tasks[task].resource, Some(resource));
                self.unassign_resource_unchecked(task);
            }
            &Operation::NodeAddParent { child, parent } => {
                self.node_add_parent_unchecked(child, parent)
            }
            &Operation::NodeDeleteParent { child, parent } => {
                assert_eq!(self.nodes[child].parent, Some(parent));
                self.node_delete_parent_unchecked(child);
            }
            &Operation::NodeAddMeet { node, meet } => self.node_add_meet_unchecked(node, meet),
            &Operation::NodeDeleteMeet { node, meet } => {
                self.node_delete_meet_unchecked(node, meet)
            }
        }
    }
}
