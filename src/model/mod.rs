pub mod attendance;
pub mod payroll;
pub mod payslip;
pub mod role;
pub mod salary;
pub mod statutory;
pub mod tax;
