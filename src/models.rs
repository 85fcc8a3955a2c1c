pub mod auth;
pub mod dashboard;
pub mod jobs;
pub mod notification;
pub mod pix;
pub mod reseller;
pub mod settings;
pub mod tracking;
pub mod whatsapp;
