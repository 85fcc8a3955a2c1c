pub mod auth;
pub mod bulk_charge_service;
pub mod dashboard_service;
pub mod job_registry;
pub mod message_template;
pub mod notification_service;
pub mod pix_service;
pub mod rate_limiter;
pub mod reconciliation_service;
pub mod reseller_service;
pub mod retry;
pub mod settings_service;
pub mod whatsapp_service;
