pub mod layout;
pub mod notice_banner;
pub mod stat_card;
pub mod status_badge;

pub use notice_banner::NoticeBanner;
pub use stat_card::StatCard;
pub use status_badge::StatusBadge;
