// ==========================================
// 集成测试公共辅助
// ==========================================
#![allow(dead_code)]

pub mod visit_builder;

pub use visit_builder::{at, referral_fixture, seventeen_visits, VisitBuilder};
