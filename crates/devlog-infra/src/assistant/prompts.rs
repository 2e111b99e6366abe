//! Prompt construction for the writing assistant.

use devlog_core::ports::GeneratePostParams;

/// Characters of content shown to the model when generating SEO metadata.
pub const SEO_PREVIEW_CHARS: usize = 500;

const BLOG_WRITER_SYSTEM: &str = "You are a technical blog writer specializing in software development and programming.
Write engaging, informative, and accurate content for developers.
Use code examples where appropriate and explain complex concepts clearly.";

/// A single chat completion request, independent of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: Option<&'static str>,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object response.
    pub json: bool,
}

pub fn generate_post(params: &GeneratePostParams) -> Prompt {
    let category = params
        .category
        .as_deref()
        .map(|c| format!(" in the {c} category"))
        .unwrap_or_default();
    let tags = if params.tags.is_empty() {
        String::new()
    } else {
        format!("- Include these tags: {}\n", params.tags.join(", "))
    };

    let user = format!(
        r#"Write a {tone} blog post about "{topic}"{category}.

Requirements:
- Length: {words} words
- Include practical code examples
- Use markdown formatting
- Add headings, lists, and code blocks
- Make it SEO-friendly
{tags}
Return the response in the following JSON format:
{{
  "title": "Blog post title",
  "excerpt": "A compelling 2-3 sentence excerpt",
  "content": "Full blog post content in markdown",
  "suggestedTags": ["tag1", "tag2", "tag3"]
}}"#,
        tone = params.tone.as_str(),
        topic = params.topic,
        words = params.length.word_range(),
    );

    Prompt {
        system: Some(BLOG_WRITER_SYSTEM),
        user,
        temperature: 0.7,
        max_tokens: 4000,
        json: true,
    }
}

pub fn explain_code(code: &str, language: &str) -> Prompt {
    let user = format!(
        "Explain the following {language} code in detail.
Break down what each part does and highlight any important concepts or best practices.

Code:
```{language}
{code}
```

Provide a clear, educational explanation suitable for a technical blog."
    );

    Prompt {
        system: None,
        user,
        temperature: 0.5,
        max_tokens: 1000,
        json: false,
    }
}

pub fn seo_metadata(title: &str, content: &str) -> Prompt {
    let preview: String = content.chars().take(SEO_PREVIEW_CHARS).collect();
    let user = format!(
        r#"Generate SEO metadata for a blog post with the following:

Title: {title}
Content Preview: {preview}...

Return JSON with:
{{
  "seoTitle": "SEO-optimized title (max 60 characters)",
  "seoDescription": "Compelling meta description (max 160 characters)",
  "seoKeywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"]
}}"#
    );

    Prompt {
        system: None,
        user,
        temperature: 0.5,
        max_tokens: 500,
        json: true,
    }
}

pub fn improve_content(content: &str, improvements: &[String]) -> Prompt {
    let numbered: Vec<String> = improvements
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect();
    let user = format!(
        "Improve the following blog post content based on these requirements:
{}

Original Content:
{content}

Return the improved version maintaining markdown formatting.",
        numbered.join("\n")
    );

    Prompt {
        system: None,
        user,
        temperature: 0.7,
        max_tokens: 3000,
        json: false,
    }
}

pub fn related_topics(topic: &str, category: &str) -> Prompt {
    let user = format!(
        r#"Given a blog post about "{topic}" in the {category} category,
suggest 5 related topics that would interest the same audience.
Return a JSON object of the form {{"topics": ["topic 1", "topic 2"]}}."#
    );

    Prompt {
        system: None,
        user,
        temperature: 0.8,
        max_tokens: 300,
        json: true,
    }
}
