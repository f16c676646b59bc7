//! Tag/length/value attributes carried inside a command's attribute block.

mod set;
mod tag;

pub use set::AttributeSet;
pub use tag::AttributeTag;

#[cfg(test)]
mod tests;
