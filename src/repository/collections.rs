//! Well-known collection and document names.

pub const USERS: &str = "users";
pub const VOLUNTEERS: &str = "volunteers";
pub const CONTACTS: &str = "contacts";
pub const DONATIONS: &str = "donations";
pub const NEWSLETTER_SUBSCRIBERS: &str = "newsletter_subscribers";
pub const PROJECTS: &str = "projects";
pub const EVENTS: &str = "events";
pub const BLOG_POSTS: &str = "blog_posts";
pub const GALLERY_IMAGES: &str = "gallery_images";
pub const TESTIMONIALS: &str = "testimonials";

/// Metric name → number mapping.
pub const STATISTICS: &str = "statistics";
/// Free-form site configuration mapping.
pub const SITE_SETTINGS: &str = "site_settings";

/// Prefix of full-export snapshot keys.
pub const BACKUP_PREFIX: &str = "backup_";

/// Every array collection, in export order.
pub const ALL: [&str; 10] = [
    USERS,
    VOLUNTEERS,
    CONTACTS,
    DONATIONS,
    NEWSLETTER_SUBSCRIBERS,
    PROJECTS,
    EVENTS,
    BLOG_POSTS,
    GALLERY_IMAGES,
    TESTIMONIALS,
];

/// Mapping documents stored next to the collections.
pub const DOCUMENTS: [&str; 2] = [STATISTICS, SITE_SETTINGS];
