// Inventory management commands
pub mod hosts;

// Interactive operator menu
pub mod menu;

// Fleet-wide command execution
pub mod run;
