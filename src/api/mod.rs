pub mod contract;
pub mod employee;
pub mod events;
pub mod hours;
pub mod payroll;
pub mod punch;
pub mod supplement;
