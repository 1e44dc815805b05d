pub mod create;
pub mod delete;
pub mod plan;
pub mod regions;
pub mod show;
pub mod update;
