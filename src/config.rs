//! Loading agent configuration (prompts + optional topic bank) from TOML.
//!
//! See `AgentConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{info, error};

use crate::domain::Topic;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub topics: Vec<Topic>,
}

/// Prompts used by the chat client. Defaults cover all six use cases.
/// You can override them in TOML if you need to tune tone/structure.
/// Placeholders use `{key}` slots filled by `util::fill_template`; literal
/// JSON braces inside the templates are left alone.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  // Challenge generation (educators)
  pub challenge_system: String,
  pub challenge_user_template: String,
  // Student problem matching
  pub match_system: String,
  pub match_user_template: String,
  // Parent curriculum building
  pub curriculum_system: String,
  pub curriculum_user_template: String,
  // Hints for stuck students
  pub hint_system: String,
  pub hint_user_template: String,
  // Bulk seeding (prompt is computed but generation is still a stub)
  pub bulk_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      challenge_system: "You are an expert math educator creating engaging, real-world math challenges for students aged {age_group}. \
Create challenges that connect abstract math to practical life situations. \
Always include step-by-step solutions and helpful hints. \
Make it fun and relevant to young people's lives.".into(),
      challenge_user_template: r#"Create a math challenge with the following requirements:
Topic: {topic}
Real-world context: {real_world_context}
Difficulty: {difficulty}
Age group: {age_group}

Provide the response in this exact JSON format:
{
  "title": "Catchy title that includes 'Math'",
  "description": "Brief description of the challenge",
  "problem": "The main problem statement with real-world context",
  "steps": [
    {
      "stepNumber": 1,
      "instruction": "Clear instruction for this step",
      "hint": "Helpful hint for this step",
      "answer": "Expected answer or approach"
    }
  ],
  "concepts": ["concept1", "concept2"],
  "estimatedTime": "time in minutes",
  "points": "point value based on difficulty",
  "realWorldConnection": "Why this matters in real life"
}"#.into(),
      match_system: "You are a helpful math tutor. A student has a real-life problem or question. \
Your job is to identify which math concepts would help solve their problem and find relevant challenges. \
Be encouraging and show how math connects to their situation.".into(),
      match_user_template: r#"Student (grade {grade_level}) asks: "{student_query}"

Respond with this JSON format:
{
  "interpretation": "What you understand they're asking",
  "relevantConcepts": ["concept1", "concept2"],
  "difficulty": "easy, medium or hard based on their grade",
  "searchTerms": ["term1", "term2"],
  "encouragement": "Positive message about how math can help",
  "example": "Quick example of how this math applies"
}"#.into(),
      curriculum_system: "You are an experienced homeschool curriculum designer. \
Create personalized math curricula that are engaging, practical, and aligned with Common Core standards. \
Focus on real-world applications and hands-on activities.".into(),
      curriculum_user_template: r#"Design a 4-week math curriculum for:
- Child age: {child_age}
- Grade: {child_grade}
- Goals: {learning_goals}
- Available time: {time_per_week} hours per week
- Child's interests: {interests}

Provide the response in this JSON format:
{
  "curriculumTitle": "Engaging title",
  "overview": "Brief overview of what will be covered",
  "weeks": [
    {
      "weekNumber": 1,
      "theme": "Week theme",
      "concepts": ["concept1", "concept2"],
      "activities": [
        {
          "day": "Monday",
          "activity": "Activity description",
          "duration": "30 mins",
          "materials": ["material1", "material2"]
        }
      ],
      "realWorldProject": "End of week project",
      "assessmentIdeas": ["assessment1", "assessment2"]
    }
  ],
  "resourcesNeeded": ["resource1", "resource2"],
  "parentTips": ["tip1", "tip2"],
  "successMetrics": ["metric1", "metric2"]
}"#.into(),
      hint_system: "You are a patient math tutor. \
The student is stuck and needs a hint that guides without giving away the answer. \
Provide progressively more detailed hints based on how many they've already used.".into(),
      hint_user_template: r#"Challenge: {problem}
Current step: {step_instruction}
Student's work so far: {student_work}
Hints already used: {hints_used}

Provide hint level {hint_level} (out of 3 max):
- Hint 1: Gentle nudge in right direction
- Hint 2: More specific guidance
- Hint 3: Step-by-step breakdown (but not the answer)

Respond with JSON:
{
  "hint": "The hint text",
  "encouragement": "Motivational message",
  "relatedConcept": "What math concept to review"
}"#.into(),
      bulk_user_template: "Create a {difficulty} math challenge about {topic} using this real-world context: {context}".into(),
    }
  }
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AgentConfig>(&s) {
      Ok(cfg) => {
        info!(target: "mathquest_backend", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "mathquest_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "mathquest_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
