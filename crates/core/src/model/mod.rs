pub mod commit;
pub mod diff;
pub mod gaze;
pub mod line;

pub use commit::{Commit, RowKind};
pub use diff::{Diff, DiffIndex, diff_id, split_index_map};
pub use gaze::{GazeSample, ResolvedGaze};
pub use line::{Line, LineDetail, LineId, LineRef, LineType};
