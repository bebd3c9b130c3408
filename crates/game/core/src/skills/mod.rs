//! Skills and their cross-system effects.
//!
//! A [`SkillBook`] tracks experience and levels. Skill effects are declared
//! in content as [`SkillEffect`]s; stat boosts reach the stat engine through
//! [`propagate`], which runs once per tick.

mod propagation;
mod skill;

pub use propagation::propagate;
pub use skill::{Skill, SkillBook, SkillDefinition, SkillEffect, SkillSnapshot};
