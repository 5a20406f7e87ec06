//! Demonstration content loaded into empty collections.

use serde_json::{json, Value};
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::projects::progress_percentage;
use super::Foundation;
use crate::record::{self, Fields, Record};
use crate::repository::collections::{BLOG_POSTS, EVENTS, GALLERY_IMAGES, PROJECTS, TESTIMONIALS};
use crate::store::Store;

fn sample_projects() -> Value {
    json!([
        {
            "title": "Amazon Reforestation Initiative",
            "description": "Planting 50,000 trees in the Amazon rainforest to combat deforestation and support biodiversity.",
            "status": "active",
            "category": "reforestation",
            "goal_amount": 100000,
            "raised_amount": 67500,
            "start_date": "2024-01-15",
            "end_date": "2024-12-31",
            "location": "Amazon Rainforest, Brazil",
            "volunteers_needed": 200,
            "volunteers_registered": 145
        },
        {
            "title": "Clean Water Access Project",
            "description": "Building wells and water purification systems in rural communities.",
            "status": "active",
            "category": "water",
            "goal_amount": 75000,
            "raised_amount": 42000,
            "start_date": "2024-03-01",
            "end_date": "2024-10-31",
            "location": "Rural India",
            "volunteers_needed": 100,
            "volunteers_registered": 78
        },
        {
            "title": "Urban Gardens Network",
            "description": "Community gardens in urban areas for sustainable agriculture and food security.",
            "status": "completed",
            "category": "agriculture",
            "goal_amount": 50000,
            "raised_amount": 52000,
            "start_date": "2023-06-01",
            "end_date": "2023-12-31",
            "location": "Various Cities",
            "volunteers_needed": 150,
            "volunteers_registered": 165
        }
    ])
}

fn sample_blog_posts() -> Value {
    json!([
        {
            "title": "10 Simple Ways to Reduce Your Carbon Footprint",
            "slug": "reduce-carbon-footprint",
            "excerpt": "Practical steps you can take today to help fight climate change.",
            "category": "tips",
            "tags": ["environment", "climate", "sustainability", "tips"],
            "author": "Environmental Team",
            "status": "published",
            "published_at": "2024-12-01T10:00:00.000Z",
            "views": 1250,
            "likes": 89,
            "comments": []
        },
        {
            "title": "The Importance of Biodiversity Conservation",
            "slug": "biodiversity-conservation",
            "excerpt": "Why protecting biodiversity is crucial for our planet's health.",
            "category": "education",
            "tags": ["biodiversity", "conservation", "ecosystem", "wildlife"],
            "author": "Research Team",
            "status": "published",
            "published_at": "2024-11-28T14:30:00.000Z",
            "views": 980,
            "likes": 67,
            "comments": []
        },
        {
            "title": "How to Start Composting at Home",
            "slug": "home-composting-guide",
            "excerpt": "Turning kitchen scraps into nutrient-rich soil for your garden.",
            "category": "guides",
            "tags": ["composting", "gardening", "waste-reduction", "diy"],
            "author": "Sustainability Team",
            "status": "published",
            "published_at": "2024-11-25T09:15:00.000Z",
            "views": 1540,
            "likes": 112,
            "comments": []
        }
    ])
}

fn sample_events() -> Value {
    json!([
        {
            "title": "World Environment Day Celebration",
            "description": "Environmental awareness activities, tree planting and community engagement.",
            "date": "2024-06-05",
            "time": "09:00 AM",
            "location": "Central Park, New York",
            "category": "awareness",
            "max_attendees": 500,
            "registration_fee": 0,
            "organizer": "Jivan-Jyoti Foundation"
        },
        {
            "title": "Beach Cleanup Drive",
            "description": "Clean the coastline and protect marine life from plastic pollution.",
            "date": "2024-07-20",
            "time": "07:00 AM",
            "location": "Santa Monica Beach, CA",
            "category": "cleanup",
            "max_attendees": 200,
            "registration_fee": 0,
            "organizer": "Jivan-Jyoti Foundation"
        },
        {
            "title": "Sustainable Living Workshop",
            "description": "Practical tips for reducing waste and conserving energy.",
            "date": "2024-08-15",
            "time": "02:00 PM",
            "location": "Community Center, Portland",
            "category": "workshop",
            "max_attendees": 50,
            "registration_fee": 25,
            "organizer": "Jivan-Jyoti Foundation"
        }
    ])
}

fn sample_testimonials() -> Value {
    json!([
        {
            "name": "Sarah Johnson",
            "role": "Environmental Scientist",
            "message": "Their reforestation work pairs a scientific approach with real community engagement.",
            "rating": 5,
            "project": "Amazon Reforestation Initiative",
            "featured": true
        },
        {
            "name": "Michael Chen",
            "role": "Volunteer Coordinator",
            "message": "The clean water project changed my perspective on environmental activism.",
            "rating": 5,
            "project": "Clean Water Access Project",
            "featured": true
        },
        {
            "name": "Emily Rodriguez",
            "role": "Community Leader",
            "message": "The urban gardens project has transformed our neighborhood.",
            "rating": 5,
            "project": "Urban Gardens Network",
            "featured": false
        }
    ])
}

fn sample_gallery_images() -> Value {
    json!([
        {
            "title": "Tree Planting in Amazon",
            "description": "Volunteers planting native species in the Amazon rainforest",
            "category": "reforestation",
            "project": "Amazon Reforestation Initiative",
            "photographer": "Foundation Team",
            "featured": true
        },
        {
            "title": "Clean Water Well Installation",
            "description": "Installing a new water well in a rural community",
            "category": "water",
            "project": "Clean Water Access Project",
            "photographer": "Foundation Team",
            "featured": true
        },
        {
            "title": "Urban Garden Harvest",
            "description": "Community members harvesting vegetables from an urban garden",
            "category": "agriculture",
            "project": "Urban Gardens Network",
            "photographer": "Foundation Team",
            "featured": false
        },
        {
            "title": "Beach Cleanup Activity",
            "description": "Volunteers collecting plastic waste from the beach",
            "category": "cleanup",
            "project": "Beach Cleanup Drive",
            "photographer": "Foundation Team",
            "featured": false
        }
    ])
}

fn items(value: Value) -> Vec<Fields> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn with_progress(mut project: Fields) -> Fields {
    let number = |field: &str| project.get(field).and_then(record::as_number).unwrap_or(0.0);
    let progress = progress_percentage(number("raised_amount"), number("goal_amount"));
    project.insert("progress_percentage".into(), record::number_value(progress));
    project
}

fn with_attendees(mut event: Fields) -> Fields {
    event.insert("status".into(), Value::String("upcoming".into()));
    event.insert("attendees".into(), Value::Array(Vec::new()));
    event.insert("registration_count".into(), Value::from(0));
    event
}

impl<S: Store> Foundation<S> {
    /// Fill each empty content collection with sample records. Collections
    /// that already hold data are left alone. Returns the seeded names.
    pub fn seed_sample_data(&self) -> Result<Outcome<Vec<String>>, DomainError> {
        let samples: [(&str, Vec<Fields>); 5] = [
            (
                PROJECTS,
                items(sample_projects()).into_iter().map(with_progress).collect(),
            ),
            (BLOG_POSTS, items(sample_blog_posts())),
            (
                EVENTS,
                items(sample_events()).into_iter().map(with_attendees).collect(),
            ),
            (TESTIMONIALS, items(sample_testimonials())),
            (GALLERY_IMAGES, items(sample_gallery_images())),
        ];

        let mut seeded = Vec::new();
        for (collection, records) in samples {
            let loaded = self.repo().transact(collection, |existing| {
                if !existing.is_empty() {
                    return Ok::<_, DomainError>(false);
                }
                existing.extend(records.into_iter().map(Record::stamped));
                Ok(true)
            })?;
            if loaded {
                seeded.push(collection.to_string());
            }
        }

        info!(collections = seeded.len(), "sample data loaded");
        Ok(Outcome::new("Sample data loaded", seeded))
    }
}
