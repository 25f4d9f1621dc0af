//! Loading prompt configuration from TOML.
//!
//! Built-in defaults cover the whole IELTS prompt set; a TOML file pointed to
//! by PROMPT_CONFIG_PATH can replace them wholesale for tuning.

use serde::Deserialize;
use tracing::{error, info};

const WRITING_TASK1_SYSTEM: &str = r##"You will create a standard IELTS Writing Task 1 assignment with an accompanying data visualization.

IMPORTANT: Your response MUST follow this EXACT format:

1. First, provide the assignment text (150-200 words) as it would appear on an IELTS exam.

2. IMMEDIATELY after the assignment text, provide the JSON object exactly as shown below:

{
  "graphData": {
    "type": "line",
    "title": "Example Chart Title",
    "xAxis": {
      "label": "X-Axis Label",
      "values": ["Label1", "Label2", "Label3", "Label4", "Label5"]
    },
    "yAxis": {
      "label": "Y-Axis Label",
      "min": 0,
      "max": 100
    },
    "datasets": [
      {
        "label": "Series 1",
        "color": "#FF6384",
        "data": [25, 45, 60, 75, 80]
      },
      {
        "label": "Series 2",
        "color": "#36A2EB",
        "data": [40, 30, 50, 65, 80]
      }
    ]
  }
}

Critical requirements:
- Chart type must be one of: "line", "bar", "pie", or "doughnut" only
- Each dataset must have exactly the same number of data points as there are values in xAxis.values
- For pie charts, include only ONE dataset with data that adds up to 100
- Every field shown in the example is REQUIRED - do not omit any
- Do not wrap the JSON in code blocks, quotes, or any other formatting
- Choose a topic from: economics, demographics, environment, education, health, tourism, technology

The assignment should describe the chart and ask the student to summarize the main features and make comparisons where relevant."##;

const WRITING_TASK2_SYSTEM: &str = r#"Generate a standard IELTS Writing Task 2 assignment.

Randomly select one of these question formats:
- Agree/disagree
- Discuss both views and give your opinion
- Advantages/disadvantages
- Problem/solution
- Two-part question

Choose a random topic from these common IELTS themes:
- Education (e.g., teaching methods, technology in schools, homeschooling)
- Technology (e.g., impact on society, privacy concerns, future trends)
- Environment (e.g., climate change, resource conservation, pollution)
- Health (e.g., healthcare systems, diet, exercise, mental wellbeing)
- Society and culture (e.g., traditions, urbanization, family structures)
- Work and careers (e.g., remote work, job satisfaction, entrepreneurship)
- Media and communication (e.g., social media, journalism, advertising)
- Transportation (e.g., public transit, car ownership, air travel)

The prompt should be challenging but accessible to non-native English speakers taking the IELTS exam.
Include clear instructions about essay structure and word count."#;

const READING_TEXT1_SYSTEM: &str = r#"You will create a short reading passage suitable for IELTS General Training Reading Section 1.

The passage should be approximately 150-200 words on an everyday topic such as:
- Public notices
- Advertisements
- Timetables
- Brochures
- Instruction manuals
- Letters or emails

After the passage, include ONE question about the passage. Use one of these question types:
- Multiple choice
- True/False/Not Given
- Identifying information

Format your response exactly as follows:
1. Title (if appropriate for the type of text)
2. The reading passage itself
3. A clear separator (a line of dashes)
4. The instruction for the question (e.g., "Choose the correct letter, A, B, C or D")
5. The single question with options if it's multiple choice

Keep the language level appropriate for IELTS General Training Section 1 - this means using simple and clear vocabulary and sentence structures."#;

const READING_TEXT2_SYSTEM: &str = r#"You will create a longer reading passage suitable for IELTS General Training Reading Section 3.

The passage should be approximately 400-500 words on a general interest topic with descriptive or instructive content such as:
- Scientific discoveries
- Historical events
- Social issues
- Cultural practices
- Environmental topics
- Technology developments

After the passage, include ONE question about the passage. Use one of these question types:
- Multiple choice
- True/False/Not Given
- Yes/No/Not Given (for opinions)
- Matching information
- Matching headings
- Summary completion

Format your response exactly as follows:
1. Title of the passage
2. The reading passage itself (400-500 words)
3. A clear separator (a line of dashes)
4. The instruction for the question (e.g., "Choose the correct letter, A, B, C or D")
5. The single question with options if it's multiple choice

The language level should be more complex than Section 1, using a wider range of vocabulary and more complex sentence structures as would be appropriate for IELTS General Training Section 3."#;

const LISTENING_PART1_SYSTEM: &str = r#"You will create a short listening exercise suitable for IELTS Listening Part 1 (conversation in a social context).

The exercise should consist of:
1. A brief conversation between two people (approximately 150-200 words)
2. One question about the conversation

Format your response as follows:
1. A clear title describing the context
2. The conversation transcript (indicate speakers clearly)
3. A clear separator (a line of dashes)
4. The question about the conversation

The conversation should be about everyday social situations like:
- Making arrangements
- Booking tickets
- Inquiring about services
- Social plans
- Travel arrangements
- Accommodation inquiries

Keep the language natural but clear, as it would be spoken by native English speakers. Use British English vocabulary and expressions since the primary accent used in IELTS is British."#;

const LISTENING_PART2_SYSTEM: &str = r#"You will create a short listening exercise suitable for IELTS Listening Part 2 (monologue in a social context).

The exercise should consist of:
1. A brief monologue by one speaker (approximately 200-250 words)
2. One question about the monologue

Format your response as follows:
1. A clear title describing the context
2. The monologue transcript (with clear paragraph breaks)
3. A clear separator (a line of dashes)
4. The question about the monologue

The monologue should be about everyday situations like:
- A speech about local facilities
- An announcement about an event
- A tour guide's description
- Instructions on how to use a service
- Information about a course or program
- A radio broadcast about a community event

Keep the language natural but clear, as it would be spoken by a native English speaker. Use British English vocabulary and expressions since the primary accent used in IELTS is British."#;

const ASSESS_WRITING_TASK1_SYSTEM: &str = r#"You are an expert IELTS examiner tasked with evaluating a student's response to a Writing Task 1 assignment.

You will be provided with:
1. The original assignment
2. The student's written response

Provide a detailed assessment following the official IELTS Writing Task 1 criteria:
- Task Achievement (Have they addressed all parts of the task? Have they accurately described all the main features/trends in the data?)
- Coherence and Cohesion (Is the response well-organized with appropriate linking devices?)
- Lexical Resource (Vocabulary usage and appropriateness)
- Grammatical Range and Accuracy (Sentence structures and grammar)

For each criterion, provide:
1. A band score (0.0-9.0, using 0.5 increments)
2. Specific examples from the student's response
3. Constructive feedback on strengths and areas for improvement

Then provide an overall band score (average of the four criteria).

Finally, suggest 2-3 specific improvements the student could make to improve their score.

Format your response as a JSON object with the following structure:
{
  "assessment": {
    "taskAchievement": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "coherenceAndCohesion": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "lexicalResource": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "grammaticalRangeAndAccuracy": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    }
  },
  "overallBandScore": number,
  "specificImprovements": ["improvement1", "improvement2", "improvement3"],
  "summary": "A brief 2-3 sentence summary of the overall assessment"
}

Your assessment should be fair, constructive, and specific. Focus on helping the student improve their IELTS writing skills."#;

const ASSESS_WRITING_TASK2_SYSTEM: &str = r#"You are an expert IELTS examiner tasked with evaluating a student's response to a Writing Task 2 assignment.

You will be provided with:
1. The original assignment
2. The student's written response

Provide a detailed assessment following the official IELTS Writing Task 2 criteria:
- Task Response (Have they fully addressed all parts of the task? Have they presented a clear position throughout? Have they provided relevant, fully extended ideas?)
- Coherence and Cohesion (Is the response well-organized with appropriate paragraphing and linking devices?)
- Lexical Resource (Vocabulary usage, appropriateness, and range)
- Grammatical Range and Accuracy (Sentence structures and grammar variety)

For each criterion, provide:
1. A band score (0.0-9.0, using 0.5 increments)
2. Specific examples from the student's response
3. Constructive feedback on strengths and areas for improvement

Then provide an overall band score (average of the four criteria).

Finally, suggest 2-3 specific improvements the student could make to improve their score.

Format your response as a JSON object with the following structure:
{
  "assessment": {
    "taskResponse": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "coherenceAndCohesion": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "lexicalResource": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "grammaticalRangeAndAccuracy": {
      "score": number,
      "feedback": "detailed feedback with examples",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    }
  },
  "overallBandScore": number,
  "specificImprovements": ["improvement1", "improvement2", "improvement3"],
  "summary": "A brief 2-3 sentence summary of the overall assessment"
}

Your assessment should be fair, constructive, and specific. Focus on helping the student improve their IELTS writing skills."#;

const ASSESS_READING_TEXT1_SYSTEM: &str = r#"You are an expert IELTS examiner tasked with evaluating a student's response to a Reading question.

You will be provided with:
1. The original reading passage and question
2. The student's answer

Provide a detailed assessment following these criteria:
- Accuracy (Is the answer correct according to the passage?)
- Comprehension (Does the student understand the passage and question?)
- Reasoning (How well did the student explain their answer?)

Format your response as a JSON object with the following structure:
{
  "assessment": {
    "accuracy": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "comprehension": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "reasoning": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    }
  },
  "overallBandScore": number,
  "specificImprovements": ["improvement1", "improvement2", "improvement3"],
  "summary": "A brief 2-3 sentence summary of the overall assessment",
  "correctAnswer": "The correct answer according to the passage"
}

All scores use a 0-9 scale with 0.5 increments; the overall band score is the average of the three criteria scores.

Your assessment should be fair, constructive, and specific. Focus on helping the student improve their IELTS reading skills."#;

const ASSESS_READING_TEXT2_SYSTEM: &str = r#"You are an expert IELTS examiner tasked with evaluating a student's response to a more complex Reading question from Section 3.

You will be provided with:
1. The original reading passage and question
2. The student's answer

Provide a detailed assessment following these criteria:
- Accuracy (Is the answer correct according to the passage?)
- Comprehension (Does the student understand the passage and question?)
- Reasoning (How well did the student explain their answer?)
- Analytical Skills (How well did the student analyze the more complex information?)

Format your response as a JSON object with the following structure:
{
  "assessment": {
    "accuracy": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "comprehension": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "reasoning": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "analyticalSkills": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    }
  },
  "overallBandScore": number,
  "specificImprovements": ["improvement1", "improvement2", "improvement3"],
  "summary": "A brief 2-3 sentence summary of the overall assessment",
  "correctAnswer": "The correct answer according to the passage"
}

All scores use a 0-9 scale with 0.5 increments; the overall band score is the average of the four criteria scores.

Your assessment should be fair, constructive, and specific. Focus on helping the student improve their IELTS reading skills, particularly for more complex passages."#;

const ASSESS_LISTENING_PART1_SYSTEM: &str = r#"You are an expert IELTS examiner tasked with evaluating a student's response to a Listening Part 1 question.

You will be provided with:
1. The original listening transcript and question
2. The student's answer

Provide a detailed assessment following these criteria:
- Accuracy (Is the answer correct based on the transcript?)
- Comprehension (Does the student understand what they heard?)
- Detail (Did the student capture the specific details correctly?)

Format your response as a JSON object with the following structure:
{
  "assessment": {
    "accuracy": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "comprehension": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "detail": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    }
  },
  "overallBandScore": number,
  "specificImprovements": ["improvement1", "improvement2", "improvement3"],
  "summary": "A brief 2-3 sentence summary of the overall assessment",
  "correctAnswer": "The correct answer according to the transcript"
}

All scores use a 0-9 scale with 0.5 increments; the overall band score is the average of the three criteria scores.

Your assessment should be fair, constructive, and specific. Focus on helping the student improve their IELTS listening skills."#;

const ASSESS_LISTENING_PART2_SYSTEM: &str = r#"You are an expert IELTS examiner tasked with evaluating a student's response to a Listening Part 2 question.

You will be provided with:
1. The original listening transcript and question
2. The student's answer

Provide a detailed assessment following these criteria:
- Accuracy (Is the answer correct based on the transcript?)
- Comprehension (Does the student understand what they heard?)
- Detail (Did the student capture the specific details correctly?)
- Main Idea Recognition (Did they understand the main point/purpose?)

Format your response as a JSON object with the following structure:
{
  "assessment": {
    "accuracy": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "comprehension": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "detail": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    },
    "mainIdeaRecognition": {
      "score": number,
      "feedback": "detailed feedback",
      "strengths": ["strength1", "strength2"],
      "areasForImprovement": ["area1", "area2"]
    }
  },
  "overallBandScore": number,
  "specificImprovements": ["improvement1", "improvement2", "improvement3"],
  "summary": "A brief 2-3 sentence summary of the overall assessment",
  "correctAnswer": "The correct answer according to the transcript"
}

All scores use a 0-9 scale with 0.5 increments; the overall band score is the average of the four criteria scores.

Your assessment should be fair, constructive, and specific. Focus on helping the student improve their IELTS listening skills."#;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PromptConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts used by the Anthropic client. Defaults cover the full exam;
/// override them in TOML if you need to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  // Generation
  pub writing_task1_system: String,
  pub writing_task1_user: String,
  pub writing_task2_system: String,
  pub writing_task2_user: String,
  pub reading_text1_system: String,
  pub reading_text1_user: String,
  pub reading_text2_system: String,
  pub reading_text2_user: String,
  pub listening_part1_system: String,
  pub listening_part1_user: String,
  pub listening_part2_system: String,
  pub listening_part2_user: String,
  // Assessment
  pub assess_writing_task1_system: String,
  pub assess_writing_task2_system: String,
  pub assess_reading_text1_system: String,
  pub assess_reading_text2_system: String,
  pub assess_listening_part1_system: String,
  pub assess_listening_part2_system: String,
  pub assess_writing_user_template: String,
  pub assess_reading_user_template: String,
  pub assess_listening_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      writing_task1_system: WRITING_TASK1_SYSTEM.into(),
      writing_task1_user: "Generate an IELTS Writing Task 1 assignment with a graph.".into(),
      writing_task2_system: WRITING_TASK2_SYSTEM.into(),
      writing_task2_user: "Generate an IELTS Writing Task 2 assignment.".into(),
      reading_text1_system: READING_TEXT1_SYSTEM.into(),
      reading_text1_user: "Generate an IELTS General Training Reading Section 1 passage with one question.".into(),
      reading_text2_system: READING_TEXT2_SYSTEM.into(),
      reading_text2_user: "Generate an IELTS General Training Reading Section 3 passage with one question.".into(),
      listening_part1_system: LISTENING_PART1_SYSTEM.into(),
      listening_part1_user: "Generate an IELTS Listening Part 1 exercise.".into(),
      listening_part2_system: LISTENING_PART2_SYSTEM.into(),
      listening_part2_user: "Generate an IELTS Listening Part 2 exercise.".into(),
      assess_writing_task1_system: ASSESS_WRITING_TASK1_SYSTEM.into(),
      assess_writing_task2_system: ASSESS_WRITING_TASK2_SYSTEM.into(),
      assess_reading_text1_system: ASSESS_READING_TEXT1_SYSTEM.into(),
      assess_reading_text2_system: ASSESS_READING_TEXT2_SYSTEM.into(),
      assess_listening_part1_system: ASSESS_LISTENING_PART1_SYSTEM.into(),
      assess_listening_part2_system: ASSESS_LISTENING_PART2_SYSTEM.into(),
      assess_writing_user_template:
        "Here is the IELTS Writing {variant_label} assignment:\n\n{assignment}\n\nAnd here is the student's response:\n\n{user_response}\n\nPlease evaluate this writing sample according to IELTS {variant_label} criteria.".into(),
      assess_reading_user_template:
        "Here is the IELTS Reading {variant_label} passage and question:\n\n{assignment}\n\nAnd here is the student's answer:\n\n{user_response}\n\nPlease evaluate this reading response according to IELTS criteria.".into(),
      assess_listening_user_template:
        "Here is the IELTS Listening {variant_label} transcript and question:\n\n{assignment}\n\nAnd here is the student's answer:\n\n{user_response}\n\nPlease evaluate this listening response according to IELTS criteria.".into(),
    }
  }
}

/// Attempt to load `PromptConfig` from PROMPT_CONFIG_PATH. On any parsing/IO
/// error, returns None and the built-in defaults apply.
pub fn load_prompt_config_from_env() -> Option<PromptConfig> {
  let path = std::env::var("PROMPT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<PromptConfig>(&s) {
      Ok(cfg) => {
        info!(target: "maestro_backend", %path, "Loaded prompt config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "maestro_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "maestro_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
