use std::collections::VecDeque;

use tilepath_core::{Cost, Point};

use crate::error::PathError;
use crate::graph::CostGraph;

/// Counters collected during one relaxation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelaxStats {
    /// Queue pops, including repeat visits of the same node.
    pub dequeued: usize,
    /// Strict improvements of some node's total.
    pub relaxations: usize,
    /// Nodes with a finite total at the end.
    pub reached: usize,
    /// Largest queue length observed.
    pub peak_queue: usize,
}

impl CostGraph {
    /// Propagate lowest accumulated cost from `start` to every reachable
    /// node.
    ///
    /// The queue is FIFO, not priority ordered: a node is re-enqueued each
    /// time a cheaper route to it turns up, even after it was already
    /// expanded. Totals only ever decrease, so the run converges to the
    /// true lowest costs. The start cell's own cost is not charged.
    ///
    /// An impassable start is still seeded with total 0 and enqueued once.
    /// It has no links, so nothing else is reached, and a route to the start
    /// itself is the single cell at cost 0. Every other impassable node stays
    /// unreached.
    pub fn relax(&mut self, start: Point) -> Result<RelaxStats, PathError> {
        let si = self.idx(start).ok_or(PathError::InvalidCoordinate {
            pos: start,
            bounds: self.bounds,
        })?;

        self.reset();
        self.improve(si, 0, None);
        self.origin = Some(si);

        let mut stats = RelaxStats::default();
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(si);
        stats.peak_queue = 1;

        while let Some(ci) = queue.pop_front() {
            stats.dequeued += 1;
            let current = &self.nodes[ci];
            let Some(current_total) = current.total else {
                continue;
            };
            let links = current.links;

            for ni in links.into_iter().flatten() {
                let Cost::Step(step) = self.nodes[ni].cost else {
                    continue;
                };
                let candidate = current_total + u64::from(step);
                if self.nodes[ni].total.is_some_and(|t| candidate >= t) {
                    continue;
                }
                log::trace!(
                    "relax {} -> {}: {candidate}",
                    self.nodes[ci].pos,
                    self.nodes[ni].pos
                );
                self.improve(ni, candidate, Some(ci));
                stats.relaxations += 1;
                queue.push_back(ni);
                stats.peak_queue = stats.peak_queue.max(queue.len());
            }
        }

        stats.reached = self.nodes.iter().filter(|n| n.total.is_some()).count();
        log::debug!(
            "relaxed from {start}: {} reached, {} relaxations, {} dequeued",
            stats.reached,
            stats.relaxations,
            stats.dequeued
        );
        Ok(stats)
    }
}
