pub mod contract;
pub mod employee;
pub mod event;
pub mod nomina;
pub mod punch;
pub mod role;
pub mod supplement;
pub mod worked_hours;
