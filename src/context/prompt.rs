/// Most folders the answer may walk through.
pub const MAX_FOLDERS: usize = 10;
/// Most high-level architecture insights requested.
pub const MAX_ARCHITECTURE_INSIGHTS: usize = 5;
/// Most additional insights requested.
pub const MAX_ADDITIONAL_INSIGHTS: usize = 5;

/// Wraps a project digest in the onboarding instructions.
pub fn build_onboarding_prompt(digest: &str) -> String {
    format!(
        r#"As a helpful AI assistant, your task is to onboard a new developer to this project. Use the following context about the project structure, README files and dependency files to create a comprehensive overview:

{digest}

Please provide an overview of the project following these guidelines:

- Determine the most important folders in the project, up to a maximum of {MAX_FOLDERS}.

- Go through each important folder step by step:
  - Explain what each folder does on its own, summarizing its README or package manifest when available.
  - Mention the most used or most notable packages in that folder and their roles.

- After covering the folders, zoom out and explain up to {MAX_ARCHITECTURE_INSIGHTS} high-level insights about the project's architecture:
  - How the different parts of the codebase fit together.
  - The overall architecture or design patterns evident from the folder structure and dependencies.

- Provide up to {MAX_ADDITIONAL_INSIGHTS} additional insights about the project's architecture that were not covered in the folder-by-folder breakdown.

Your response should be structured, clear, and focused on giving the new developer both a detailed understanding of the individual components and a high-level overview of the project as a whole.

Here is an example of a valid response:

## Important folders

### /folder1
- Description: Contains the main application logic
- Key packages: Express.js for routing, Mongoose for database access

#### /folder1/folder2

## Project architecture
- The frontend uses React with Redux for state management
- The backend is a Node.js application using Express.js for routing and Mongoose for database access
- The application follows a Model-View-Controller (MVC) architecture

## Additional insights
- The project uses a monorepo structure
- The project uses TypeScript for type checking
"#
    )
}
