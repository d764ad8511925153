mod column;
mod constraint;
mod database;
mod domain;
mod enumeration;
mod extension;
mod function;
mod index;
mod operator;
mod policy;
mod privilege;
mod relation;
mod rule;
mod schema;
mod sequence;
mod table;
mod trigger;
mod view;

pub use column::*;
pub use constraint::*;
pub use database::*;
pub use domain::*;
pub use enumeration::*;
pub use extension::*;
pub use function::*;
pub use index::*;
pub use operator::*;
pub use policy::*;
pub use privilege::*;
pub use relation::*;
pub use rule::*;
pub use schema::*;
pub use sequence::*;
pub use table::*;
pub use trigger::*;
pub use view::*;
