//! `nf-algo`: the network engines.
//!
//! Each capability is a small trait with one concrete engine.  Engines
//! borrow an [`InternalNet`](nf_net::InternalNet) read-only and own their
//! working state, so independent solves can run on separate threads.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`heap`]    | `DaryHeap` (indexed d-ary min-heap with decrease-key)          |
//! | [`spt`]     | `ShortestPathEngine`, `DijkstraSpt`, `SptQuery`, `SptResult`   |
//! | [`mst`]     | `SpanningTreeEngine`, `PrimMst`, `MstResult`                   |
//! | [`simplex`] | `MinCostFlowEngine`, `NetworkSimplex`, `McfResult`             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on result types.           |

pub mod heap;
pub mod mst;
pub mod simplex;
pub mod spt;


pub use heap::{DaryHeap, ItemState};
pub use mst::{MstResult, PrimMst, SpanningTreeEngine};
pub use simplex::{McfResult, MinCostFlowEngine, NetworkSimplex};
pub use spt::{DijkstraSpt, ShortestPathEngine, SptQuery, SptResult};
