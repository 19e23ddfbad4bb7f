//! `nf-net`: the `InternalNet` graph store.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`network`]  | `InternalNet` (SoA arcs, out/in CSR, id maps, R-tree), `ArcData` |
//! | [`builder`]  | `InternalNetBuilder`, arc splitting                           |
//! | [`split`]    | `SplittedArc`, `SwappedOldArc`                                |
//! | [`balance`]  | `BalancedNet`, dummy-node supply balancing                    |
//! | [`geometry`] | `RouteShape`, encoded polylines                               |
//! | [`loader`]   | `ColumnMap`, CSV arc/node tables                              |
//! | [`error`]    | `NetError`, `NetResult<T>`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public record types.    |

pub mod balance;
pub mod builder;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod network;
pub mod split;


pub use balance::BalancedNet;
pub use builder::InternalNetBuilder;
pub use error::{NetError, NetResult};
pub use geometry::{RouteShape, encode_polyline};
pub use loader::{ColumnMap, load_arcs_reader, load_csv, load_nodes_reader};
pub use network::{ArcData, InternalNet};
pub use split::{SplittedArc, SwappedOldArc};
