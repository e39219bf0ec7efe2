//! Supply and demand chunks bridging meets to resource matching.
//!
//! Every offset of every meet owns one supply chunk (capacity available at
//! that offset) and one demand chunk (what the meet's tasks require there).
//! Each demand chunk has a base: the supply chunk it draws from. With
//! root-relative bases the base is the supply chunk of the meet's root at
//! the matching absolute offset; otherwise it is the meet's own supply chunk.
//!
//! [`ChunkMatching::unmatched_demand`] counts the demand nodes that cannot be
//! matched to distinct resources within each base.

use std::collections::HashMap;

use smallvec::SmallVec;
use timeforge_config::MatchingMode;
use timeforge_core::{Instance, ResourceGroupId, ResourceId};

use crate::arena::Arena;
use crate::ids::{DemandChunkId, MeetId, SupplyChunkId};

/// What one task demands at one offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemandNode {
    /// Any resource of the group.
    Group(ResourceGroupId),
    /// Exactly this resource.
    Resource(ResourceId),
}

/// Capacity at one offset of one meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyChunk {
    /// Owning meet and offset, `None` while on the free list.
    pub(crate) owner: Option<(MeetId, usize)>,
}

/// Requirement at one offset of one meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandChunk {
    pub(crate) meet: MeetId,
    pub(crate) offset: usize,
    pub(crate) base: SupplyChunkId,
    pub(crate) domain: SmallVec<[DemandNode; 4]>,
}

impl SupplyChunk {
    #[inline]
    pub fn owner(&self) -> Option<(MeetId, usize)> {
        self.owner
    }
}

impl DemandChunk {
    #[inline]
    pub fn meet(&self) -> MeetId {
        self.meet
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn base(&self) -> SupplyChunkId {
        self.base
    }

    #[inline]
    pub fn domain(&self) -> &[DemandNode] {
        &self.domain
    }
}

/// Chunk storage with a supply free list.
#[derive(Debug, Clone, Default)]
pub struct ChunkMatching {
    mode: MatchingMode,
    pub(crate) supply: Arena<SupplyChunkId, SupplyChunk>,
    pub(crate) demand: Arena<DemandChunkId, DemandChunk>,
    pub(crate) free_supply: Vec<SupplyChunkId>,
}

impl ChunkMatching {
    pub fn new(mode: MatchingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Chunk storage of a copied solution: live chunks only, nothing free.
    pub(crate) fn from_chunks(
        mode: MatchingMode,
        supply: Arena<SupplyChunkId, SupplyChunk>,
        demand: Arena<DemandChunkId, DemandChunk>,
    ) -> Self {
        Self {
            mode,
            supply,
            demand,
            free_supply: Vec::new(),
        }
    }

    #[inline]
    pub fn mode(&self) -> MatchingMode {
        self.mode
    }

    /// Returns true if demand bases follow the root of each meet.
    #[inline]
    pub fn needs_root_bases(&self) -> bool {
        self.mode.needs_root_bases()
    }

    pub fn supply_chunk(&self, id: SupplyChunkId) -> &SupplyChunk {
        &self.supply[id]
    }

    pub fn demand_chunk(&self, id: DemandChunkId) -> &DemandChunk {
        &self.demand[id]
    }

    /// Supply chunks waiting for reuse.
    pub fn free_supply_chunks(&self) -> &[SupplyChunkId] {
        &self.free_supply
    }

    /// Number of supply chunks in use.
    pub fn supply_chunk_count(&self) -> usize {
        self.supply.len() - self.free_supply.len()
    }

    pub fn demand_chunk_count(&self) -> usize {
        self.demand.len()
    }

    /// Takes a supply chunk from the free list, or creates one.
    pub(crate) fn make_supply_chunk(&mut self, meet: MeetId, offset: usize) -> SupplyChunkId {
        match self.free_supply.pop() {
            Some(id) => {
                self.supply[id].owner = Some((meet, offset));
                id
            }
            None => self.supply.insert(SupplyChunk {
                owner: Some((meet, offset)),
            }),
        }
    }

    /// Returns a supply chunk to the free list.
    pub(crate) fn free_supply_chunk(&mut self, id: SupplyChunkId) {
        let chunk = &mut self.supply[id];
        assert!(chunk.owner.is_some(), "{} freed twice", id);
        chunk.owner = None;
        self.free_supply.push(id);
    }

    pub(crate) fn make_demand_chunk(
        &mut self,
        meet: MeetId,
        offset: usize,
        base: SupplyChunkId,
        domain: SmallVec<[DemandNode; 4]>,
    ) -> DemandChunkId {
        self.demand.insert(DemandChunk {
            meet,
            offset,
            base,
            domain,
        })
    }

    pub(crate) fn delete_demand_chunk(&mut self, id: DemandChunkId) {
        self.demand.remove(id);
    }

    #[inline]
    pub(crate) fn set_base(&mut self, id: DemandChunkId, base: SupplyChunkId) {
        self.demand[id].base = base;
    }

    pub(crate) fn set_domain(&mut self, id: DemandChunkId, domain: SmallVec<[DemandNode; 4]>) {
        self.demand[id].domain = domain;
    }

    /// Records that a supply chunk now sits at `offset` of `meet`.
    pub(crate) fn move_supply_chunk(&mut self, id: SupplyChunkId, meet: MeetId, offset: usize) {
        self.supply[id].owner = Some((meet, offset));
    }

    /// Records that a demand chunk now sits at `offset` of `meet`.
    pub(crate) fn move_demand_chunk(&mut self, id: DemandChunkId, meet: MeetId, offset: usize) {
        let chunk = &mut self.demand[id];
        chunk.meet = meet;
        chunk.offset = offset;
    }

    /// Counts demand nodes that cannot be matched to distinct resources.
    ///
    /// Demand chunks sharing a base compete for the same resources; each
    /// base is matched independently with augmenting paths.
    pub fn unmatched_demand(&self, instance: &Instance) -> usize {
        if !self.mode.is_enabled() {
            return 0;
        }
        let mut by_base: HashMap<SupplyChunkId, Vec<DemandNode>> = HashMap::new();
        for (_, chunk) in self.demand.iter() {
            if !chunk.domain.is_empty() {
                by_base
                    .entry(chunk.base)
                    .or_default()
                    .extend(chunk.domain.iter().copied());
            }
        }
        by_base
            .values()
            .map(|nodes| nodes.len() - max_matching(instance, nodes))
            .sum()
    }
}

/// Size of a maximum matching of demand nodes to distinct resources.
fn max_matching(instance: &Instance, nodes: &[DemandNode]) -> usize {
    let candidates: Vec<&[ResourceId]> = nodes
        .iter()
        .map(|node| match node {
            DemandNode::Group(g) => instance.resource_group(*g).resources(),
            DemandNode::Resource(r) => std::slice::from_ref(r),
        })
        .collect();
    let mut matched_to: Vec<Option<usize>> = vec![None; instance.resource_count()];
    let mut size = 0;
    for node in 0..nodes.len() {
        let mut seen = vec![false; instance.resource_count()];
        if augment(node, &candidates, &mut matched_to, &mut seen) {
            size += 1;
        }
    }
    size
}

fn augment(
    node: usize,
    candidates: &[&[ResourceId]],
    matched_to: &mut [Option<usize>],
    seen: &mut [bool],
) -> bool {
    for r in candidates[node] {
        let r = r.index();
        if seen[r] {
            continue;
        }
        seen[r] = true;
        let free = match matched_to[r] {
            None => true,
            Some(other) => augment(other, candidates, matched_to, seen),
        };
        if free {
            matched_to[r] = Some(node);
            return true;
        }
    }
    false
}
