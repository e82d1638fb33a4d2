//! SWC text formats.
//!
//! - plain SWC: 7 space-separated columns, no header, six decimals
//! - extended SWC: header row plus one `<surface>_labels` column per surface
//!   (whitespace in the name becomes `_`), comma-joined label ids or `-1`
//! - region statistics tables: tab-separated, one row per label
//!
//! Coordinates are written relative to the dataset origin, either in physical
//! units or in continuous voxel coordinates ([`SwcUnits`]).

mod error;
mod read;
mod table;
mod units;
mod write;

pub use error::SwcError;
pub use read::{SwcRecord, read_swc, records_to_skeleton};
pub use table::{STATS_HEADER, write_stats_table};
pub use units::{SwcUnits, from_swc_coords, to_swc_coords};
pub use write::{label_column, write_swc_extended, write_swc_plain};
