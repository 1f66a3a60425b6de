//! System prompts and prompt builders.

use crate::llm::ChatMessage;

/// System prompt for the image description step.
pub const IMAGE_SYSTEM_PROMPT: &str = r"You are an assistant that transcribes figures from theoretical mechanics problems.

Describe the image so that someone who cannot see it can solve the problem:

1. List every body, support, joint, rope, pulley, spring and surface shown.
2. Give all labelled dimensions, angles, masses, forces, moments and velocities with their symbols and units.
3. State the coordinate axes and directions of arrows exactly as drawn.
4. Describe how the parts are connected and which constraints act on them.
5. Transcribe any text or formula printed in the figure.

Do not solve the problem. Do not guess values that are not shown; say that they are not given.
Write formulas in LaTeX using \( \) for inline math and \[ \] for display math.";

/// System prompt for the solving step.
pub const SOLVER_SYSTEM_PROMPT: &str = r"You are an expert in theoretical mechanics: statics, kinematics and dynamics of particles and rigid bodies, and analytical mechanics.

Solve the problem step by step:

1. Restate what is given and what is asked.
2. Choose the bodies, coordinates and reference frames, and justify the choice.
3. Draw up the free-body diagrams in words and list all forces and constraints.
4. Write the governing equations and solve them symbolically before substituting numbers.
5. Check units and limiting cases, then state the final answer clearly.

Format the answer in markdown with numbered steps.
Write every formula in LaTeX using \( \) for inline math and \[ \] for display math.";

/// Builds the user prompt for the image description step.
#[must_use]
pub fn image_prompt(problem: &str) -> String {
    format!(
        "The figure belongs to the following problem:\n\n{problem}\n\nDescribe the figure in detail."
    )
}

/// Builds the user prompt for the solving step.
#[must_use]
pub fn solver_prompt(problem: &str, description: Option<&str>) -> String {
    let mut prompt = format!("## Problem\n\n{problem}\n");
    if let Some(description) = description {
        prompt.push_str("\n## Figure description\n\n");
        prompt.push_str(description);
        prompt.push('\n');
    }
    prompt.push_str("\nSolve the problem.");
    prompt
}

/// Messages for the image description request.
#[must_use]
pub fn image_messages(problem: &str, image_url: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(IMAGE_SYSTEM_PROMPT),
        ChatMessage::user_with_image(image_prompt(problem), image_url),
    ]
}

/// Messages for the solving request.
#[must_use]
pub fn solver_messages(problem: &str, description: Option<&str>) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SOLVER_SYSTEM_PROMPT),
        ChatMessage::user(solver_prompt(problem, description)),
    ]
}
