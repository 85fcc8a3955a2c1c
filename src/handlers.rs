pub mod auth;
pub mod dashboard;
pub mod jobs;
pub mod notifications;
pub mod pix;
pub mod proxy;
pub mod resellers;
pub mod settings;
pub mod whatsapp;
