mod show;
mod simulate;
mod slots;
mod validate;

pub use show::Show;
pub use simulate::Simulate;
pub use slots::Slots;
pub use validate::Validate;
