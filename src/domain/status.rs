//! Entity kinds and their status machines.
//!
//! Each entity with a `status` field has a fixed set of states and an
//! explicit table of allowed transitions. Re-setting the current status is
//! always allowed.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;
use crate::repository::collections;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Volunteer,
    Contact,
    Donation,
    Subscriber,
    Project,
    Event,
    BlogPost,
    GalleryImage,
    Testimonial,
}

type Edge = (&'static str, &'static str);

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Volunteer,
        EntityKind::Contact,
        EntityKind::Donation,
        EntityKind::Subscriber,
        EntityKind::Project,
        EntityKind::Event,
        EntityKind::BlogPost,
        EntityKind::GalleryImage,
        EntityKind::Testimonial,
    ];

    /// The collection records of this kind live in.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Volunteer => collections::VOLUNTEERS,
            EntityKind::Contact => collections::CONTACTS,
            EntityKind::Donation => collections::DONATIONS,
            EntityKind::Subscriber => collections::NEWSLETTER_SUBSCRIBERS,
            EntityKind::Project => collections::PROJECTS,
            EntityKind::Event => collections::EVENTS,
            EntityKind::BlogPost => collections::BLOG_POSTS,
            EntityKind::GalleryImage => collections::GALLERY_IMAGES,
            EntityKind::Testimonial => collections::TESTIMONIALS,
        }
    }

    pub fn from_collection(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Volunteer => "volunteer",
            EntityKind::Contact => "contact",
            EntityKind::Donation => "donation",
            EntityKind::Subscriber => "subscriber",
            EntityKind::Project => "project",
            EntityKind::Event => "event",
            EntityKind::BlogPost => "blog post",
            EntityKind::GalleryImage => "gallery image",
            EntityKind::Testimonial => "testimonial",
        }
    }

    /// Valid status values. Empty for kinds without a status machine.
    pub fn statuses(self) -> &'static [&'static str] {
        match self {
            EntityKind::Volunteer => &["pending", "active", "rejected"],
            EntityKind::Contact => &["new", "in_progress", "resolved"],
            EntityKind::Donation => &["pending", "completed"],
            EntityKind::Subscriber => &["active", "unsubscribed"],
            EntityKind::Project => &["planning", "active", "completed"],
            EntityKind::Event => &["upcoming", "ongoing", "completed", "cancelled"],
            EntityKind::BlogPost => &["draft", "published", "archived"],
            EntityKind::GalleryImage | EntityKind::Testimonial => &[],
        }
    }

    fn transitions(self) -> &'static [Edge] {
        match self {
            EntityKind::Volunteer => &[
                ("pending", "active"),
                ("pending", "rejected"),
                ("active", "rejected"),
                ("rejected", "pending"),
            ],
            EntityKind::Contact => &[
                ("new", "in_progress"),
                ("new", "resolved"),
                ("in_progress", "resolved"),
                ("resolved", "in_progress"),
            ],
            EntityKind::Donation => &[("pending", "completed")],
            EntityKind::Subscriber => &[("active", "unsubscribed"), ("unsubscribed", "active")],
            EntityKind::Project => &[
                ("planning", "active"),
                ("planning", "completed"),
                ("active", "completed"),
            ],
            EntityKind::Event => &[
                ("upcoming", "ongoing"),
                ("upcoming", "completed"),
                ("upcoming", "cancelled"),
                ("ongoing", "completed"),
            ],
            EntityKind::BlogPost => &[
                ("draft", "published"),
                ("published", "archived"),
                ("published", "draft"),
                ("archived", "draft"),
            ],
            EntityKind::GalleryImage | EntityKind::Testimonial => &[],
        }
    }

    pub fn has_status_machine(self) -> bool {
        !self.statuses().is_empty()
    }

    pub fn can_transition(self, from: &str, to: &str) -> bool {
        from == to || self.transitions().contains(&(from, to))
    }

    /// Validate moving a record from `from` (if it has a status) to `to`.
    pub fn check_transition(self, from: Option<&str>, to: &str) -> Result<(), DomainError> {
        if !self.has_status_machine() {
            return Ok(());
        }
        if !self.statuses().contains(&to) {
            return Err(DomainError::Validation(format!(
                "invalid {} status: {}",
                self.name(),
                to
            )));
        }
        match from {
            Some(from) if self.statuses().contains(&from) && !self.can_transition(from, to) => {
                Err(DomainError::InvalidTransition {
                    entity: self.name(),
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::from_collection(s).ok_or_else(|| format!("unknown collection: {}", s))
    }
}
