// Rollups over the session store: category scores, drills that keep
// missing their targets, and the areas-of-improvement report.

pub mod areas;
pub mod below_target;
pub mod category_scores;

pub use areas::*;
pub use below_target::*;
pub use category_scores::*;
