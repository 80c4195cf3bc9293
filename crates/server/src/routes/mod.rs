pub mod agents;
pub mod chat;
pub mod commands;
pub mod dashboard;
pub mod government;
pub mod health;
pub mod intelligence;
pub mod management;
pub mod memory;
pub mod news;
pub mod planning;
pub mod voice;
