//! Seeding configuration.

/// Email domain of every seeded user; clearing relies on it.
pub const SEED_EMAIL_DOMAIN: &str = "seed.edudesk.local";

/// Description written on seeded classes and subjects.
pub const SEED_MARKER: &str = "Seeded by edudesk-cli";

/// How much fake data to generate.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub students: usize,
    pub teachers: usize,
    pub classes: usize,
    pub subjects: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students: 50,
            teachers: 5,
            classes: 3,
            subjects: 6,
        }
    }
}

impl SeedConfig {
    pub fn new(students: usize, teachers: usize) -> Self {
        Self {
            students,
            teachers,
            ..Default::default()
        }
    }

    pub fn with_classes(mut self, classes: usize) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_subjects(mut self, subjects: usize) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn total_users(&self) -> usize {
        self.students + self.teachers
    }
}
