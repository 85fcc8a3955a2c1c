pub mod state_store;
pub use state_store::StateStore;
pub mod tracking_repo;
pub use tracking_repo::TrackingRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod preferences_repo;
pub use preferences_repo::PreferencesRepository;
