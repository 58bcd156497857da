//! Synthetic identities and category assignment for accepted candidates.

use crate::corpus::{
    Category, CategoryDistribution, HistoricalRecord, SourceKind, SynthesizedRecord,
    SyntheticIdentity,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

const FIRST_NAMES: &[&str] = &[
    "Oliver", "George", "Harry", "Jack", "Jacob", "Noah", "Charlie", "Thomas", "Oscar", "William",
    "James", "Leo", "Alfie", "Henry", "Joshua", "Olivia", "Amelia", "Isla", "Emily", "Poppy",
    "Ava", "Isabella", "Jessica", "Lily", "Sophie", "Grace", "Mia", "Evie", "Ruby", "Ella",
    "Sarah", "Emma", "Laura", "Rachel", "Hannah", "Lucy", "Katie", "Rebecca", "John", "David",
    "Michael", "Paul", "Andrew", "Mark", "Peter", "Richard",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Jones", "Williams", "Taylor", "Brown", "Davies", "Evans", "Wilson", "Thomas",
    "Roberts", "Johnson", "Lewis", "Walker", "Robinson", "Wood", "Thompson", "White", "Watson",
    "Jackson", "Wright", "Green", "Harris", "Cooper", "King", "Lee", "Martin", "Clarke", "James",
    "Morgan", "Hughes", "Edwards", "Hill", "Moore", "Clark", "Harrison", "Scott", "Young",
    "Morris", "Hall", "Ward",
];

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "outlook.com",
    "yahoo.co.uk",
    "hotmail.co.uk",
    "btinternet.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmailFormat {
    Dotted,
    Joined,
    Underscored,
    NumberSuffix,
}

const EMAIL_FORMATS: [EmailFormat; 4] = [
    EmailFormat::Dotted,
    EmailFormat::Joined,
    EmailFormat::Underscored,
    EmailFormat::NumberSuffix,
];

/// Builds plausible submitter records around accepted text. Identities carry
/// no uniqueness guarantee.
#[derive(Debug, Clone)]
pub struct RecordFactory {
    first_names: &'static [&'static str],
    last_names: &'static [&'static str],
    domains: &'static [&'static str],
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self {
            first_names: FIRST_NAMES,
            last_names: LAST_NAMES,
            domains: EMAIL_DOMAINS,
        }
    }
}

impl RecordFactory {
    pub fn synthesize<R: Rng>(
        &self,
        text: &str,
        distribution: &CategoryDistribution,
        created_at: DateTime<Utc>,
        rng: &mut R,
    ) -> SynthesizedRecord {
        let identity = self.identity(rng);
        let category = pick_category(distribution, rng.random::<f64>());

        SynthesizedRecord {
            submission_id: format!("synthetic_{}", Uuid::new_v4()),
            identity,
            record: HistoricalRecord {
                text: text.to_string(),
                created_at,
                category,
                source_kind: SourceKind::Synthetic,
            },
        }
    }

    pub fn identity<R: Rng>(&self, rng: &mut R) -> SyntheticIdentity {
        let first_name = self.first_names.choose(rng).copied().unwrap_or("Alex");
        let last_name = self.last_names.choose(rng).copied().unwrap_or("Smith");
        let format = EMAIL_FORMATS
            .choose(rng)
            .copied()
            .unwrap_or(EmailFormat::Dotted);
        let suffix = rng.random_range(0..999);
        let domain = self.domains.choose(rng).copied().unwrap_or("gmail.com");

        SyntheticIdentity {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!(
                "{}@{domain}",
                local_part(format, first_name, last_name, suffix)
            ),
        }
    }
}

fn local_part(format: EmailFormat, first: &str, last: &str, suffix: u32) -> String {
    let first = first.to_lowercase();
    let last = last.to_lowercase();
    match format {
        EmailFormat::Dotted => format!("{first}.{last}"),
        EmailFormat::Joined => format!("{first}{last}"),
        EmailFormat::Underscored => format!("{first}_{last}"),
        EmailFormat::NumberSuffix => format!("{first}{suffix}"),
    }
}

/// Cumulative-weight draw over the category counts for a roll in `[0, 1)`.
/// An empty distribution yields the default category.
pub fn pick_category(distribution: &CategoryDistribution, roll: f64) -> Category {
    let total: u64 = distribution.values().sum();
    if total == 0 {
        return Category::default();
    }

    #[allow(clippy::cast_precision_loss)]
    let target = roll.clamp(0.0, 1.0) * total as f64;
    let mut cumulative = 0.0;
    let mut last = Category::default();
    for (&category, &count) in distribution.iter().filter(|(_, count)| **count > 0) {
        #[allow(clippy::cast_precision_loss)]
        {
            cumulative += count as f64;
        }
        last = category;
        if target < cumulative {
            return category;
        }
    }
    last
}
