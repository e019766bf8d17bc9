pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, info, section, success, summary_row, warn};
pub use table::{TableBuilder, stats_table, top_skills_table};
pub use theme::{Theme, theme};
