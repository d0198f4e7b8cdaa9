pub mod check;
pub mod labels;
pub mod lookup;
pub mod rules;
pub mod validate;
