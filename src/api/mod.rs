pub mod payroll;
pub mod statutory;
pub mod tax;
