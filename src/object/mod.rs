pub mod index;

mod value;
pub use value::*;

mod dense;
pub use dense::*;

mod sparse;
pub use sparse::*;

mod mapping;
pub use mapping::*;

mod table;
pub use table::*;

mod frozen;
pub use frozen::*;

mod elem;
pub use elem::*;

mod attrs;
pub use attrs::*;
