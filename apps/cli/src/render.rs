use std::io::{self, Write};

use client_core::{
    content::{
        ActivityCategory, ContentProvider, Location, PostCategory, ResourceCategory, SpecialistKind,
        SpecialistQuery,
    },
    theme::{hex_to_rgb, Palette, Theme},
};

/// Applies the palette to terminal output; plain text when `ansi` is off.
#[derive(Debug, Clone, Copy)]
pub struct Styler {
    palette: &'static Palette,
    ansi: bool,
}

impl Styler {
    pub fn new(theme: Theme, ansi: bool) -> Self {
        Self {
            palette: theme.palette(),
            ansi,
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self::new(Theme::Light, false)
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, self.palette.primary, true)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(text, self.palette.secondary, false)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, self.palette.muted, false)
    }

    pub fn danger(&self, text: &str) -> String {
        self.paint(text, self.palette.danger, false)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, self.palette.success, true)
    }

    fn paint(&self, text: &str, hex: &str, bold: bool) -> String {
        match hex_to_rgb(hex).filter(|_| self.ansi) {
            Some((r, g, b)) => {
                let weight = if bold { "1;" } else { "" };
                format!("\x1b[{weight}38;2;{r};{g};{b}m{text}\x1b[0m")
            }
            None => text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ContentKind {
    Resources,
    Posts,
    Stories,
    Activities,
    Specialists,
}

#[derive(Debug, Clone, Default)]
pub struct ContentFilters {
    pub category: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
}

fn parse_or_all<T: std::str::FromStr<Err = String> + Default>(
    raw: Option<&str>,
) -> anyhow::Result<T> {
    match raw {
        Some(raw) => raw.parse::<T>().map_err(anyhow::Error::msg),
        None => Ok(T::default()),
    }
}

pub async fn print_content(
    provider: &dyn ContentProvider,
    kind: ContentKind,
    filters: &ContentFilters,
    styler: &Styler,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let category = filters.category.as_deref();
    match kind {
        ContentKind::Resources => {
            let category: ResourceCategory = parse_or_all(category)?;
            writeln!(out, "{}", styler.heading("Learning resources"))?;
            for resource in provider.learning_resources(category).await {
                writeln!(
                    out,
                    "{} [{:?}] {}",
                    resource.title,
                    resource.format,
                    styler.muted(&resource.description)
                )?;
                writeln!(out, "  {}", resource.languages.join(", "))?;
            }
        }
        ContentKind::Posts => {
            let category: PostCategory = parse_or_all(category)?;
            writeln!(out, "{}", styler.heading("Community"))?;
            for post in provider.community_posts(category).await {
                writeln!(
                    out,
                    "{} {}",
                    post.title,
                    styler.muted(&format!("by {}, {}", post.author, post.posted))
                )?;
                writeln!(out, "  {}", post.excerpt)?;
                writeln!(out, "  {} replies, {} likes", post.replies, post.likes)?;
            }
        }
        ContentKind::Stories => {
            writeln!(out, "{}", styler.heading("Success stories"))?;
            for story in provider.success_stories().await {
                writeln!(out, "{}: {}", story.title, story.description)?;
            }
        }
        ContentKind::Activities => {
            let category: ActivityCategory = parse_or_all(category)?;
            writeln!(out, "{}", styler.heading("Activities"))?;
            for activity in provider.activities(category).await {
                writeln!(
                    out,
                    "{} {}",
                    activity.title,
                    styler.muted(&format!(
                        "({}, {} min)",
                        activity.ages, activity.duration_minutes
                    ))
                )?;
                writeln!(out, "  {}", activity.description)?;
            }
        }
        ContentKind::Specialists => {
            let query = SpecialistQuery {
                kind: category
                    .map(str::parse::<SpecialistKind>)
                    .transpose()
                    .map_err(anyhow::Error::msg)?,
                location: filters
                    .location
                    .as_deref()
                    .map(str::parse::<Location>)
                    .transpose()
                    .map_err(anyhow::Error::msg)?,
                search: filters.search.clone(),
            };
            writeln!(out, "{}", styler.heading("Specialists"))?;
            let specialists = provider.specialists(&query).await;
            if specialists.is_empty() {
                writeln!(out, "{}", styler.muted("No specialists match these filters."))?;
            }
            for specialist in specialists {
                writeln!(
                    out,
                    "{}, {} - {}",
                    specialist.name,
                    specialist.title,
                    specialist.location.display_name()
                )?;
                writeln!(
                    out,
                    "  {:.1} ({} reviews) | {}",
                    specialist.rating,
                    specialist.reviews,
                    specialist.languages.join(", ")
                )?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

pub fn stdout_supports_color() -> bool {
    use std::io::IsTerminal;
    io::stdout().is_terminal()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
