//! Seed data: the built-in topic bank for the bulk content seeder.

use crate::domain::Topic;

fn topic(name: &str, context: &str) -> Topic {
  Topic { name: name.into(), context: context.into() }
}

/// Ten topic/context pairs the bulk seeder crosses with the three
/// difficulties (30 combinations). Overridable via `[[topics]]` in the TOML
/// agent config.
pub fn seed_topics() -> Vec<Topic> {
  vec![
    topic("Compound Interest", "Saving for a car"),
    topic("Probability", "Gaming loot boxes"),
    topic("Statistics", "Social media metrics"),
    topic("Linear Equations", "Phone plan comparison"),
    topic("Exponential Growth", "Viral TikTok videos"),
    topic("Percentages", "Sales and discounts"),
    topic("Ratios", "Recipe scaling"),
    topic("Data Analysis", "Sports statistics"),
    topic("Geometry", "Room decoration"),
    topic("Functions", "Uber pricing"),
  ]
}
