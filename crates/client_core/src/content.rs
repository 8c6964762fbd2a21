//! Read-only informational content shown outside the questionnaire.
//!
//! Screens depend on [`ContentProvider`]; [`StaticContentProvider`] serves the
//! content bundled with the app until a content API exists.

use std::str::FromStr;

use async_trait::async_trait;

macro_rules! category_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            #[default]
            All,
            $($variant),+
        }

        impl $name {
            pub fn label(self) -> &'static str {
                match self {
                    Self::All => "all",
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.eq_ignore_ascii_case("all") {
                    return Ok(Self::All);
                }
                $(
                    if s.eq_ignore_ascii_case($label) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("unknown {} '{s}'", stringify!($name)))
            }
        }
    };
}

category_enum!(ResourceCategory {
    Podcasts => "podcasts",
    Videos => "videos",
    Guides => "guides",
    Stories => "stories",
});

category_enum!(PostCategory {
    Questions => "questions",
    Stories => "stories",
    Support => "support",
});

category_enum!(ActivityCategory {
    Communication => "communication",
    Sensory => "sensory",
    Social => "social",
    Motor => "motor",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFormat {
    Audio,
    Video,
    Pdf,
    Article,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningResource {
    pub title: String,
    pub description: String,
    pub format: ResourceFormat,
    pub category: ResourceCategory,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostTag {
    Question,
    Success,
    Support,
}

impl PostTag {
    fn category(self) -> PostCategory {
        match self {
            Self::Question => PostCategory::Questions,
            Self::Success => PostCategory::Stories,
            Self::Support => PostCategory::Support,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommunityPost {
    pub author: String,
    pub avatar: String,
    pub posted: String,
    pub title: String,
    pub excerpt: String,
    pub replies: u32,
    pub likes: u32,
    pub tag: PostTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessStory {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub ages: String,
    pub duration_minutes: u32,
    pub category: ActivityCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialistKind {
    Psychologist,
    Speech,
    Education,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Yaounde,
    Douala,
    Bamenda,
}

impl Location {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Yaounde => "Yaoundé",
            Self::Douala => "Douala",
            Self::Bamenda => "Bamenda",
        }
    }
}

impl FromStr for SpecialistKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "psychologist" => Ok(Self::Psychologist),
            "speech" => Ok(Self::Speech),
            "education" => Ok(Self::Education),
            other => Err(format!("unknown specialist type '{other}'")),
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yaounde" | "yaoundé" => Ok(Self::Yaounde),
            "douala" => Ok(Self::Douala),
            "bamenda" => Ok(Self::Bamenda),
            other => Err(format!("unknown location '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Specialist {
    pub name: String,
    pub title: String,
    pub description: String,
    pub kind: SpecialistKind,
    pub location: Location,
    pub languages: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
}

/// `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialistQuery {
    pub kind: Option<SpecialistKind>,
    pub location: Option<Location>,
    pub search: Option<String>,
}

impl SpecialistQuery {
    pub fn matches(&self, specialist: &Specialist) -> bool {
        if self.kind.is_some_and(|kind| kind != specialist.kind) {
            return false;
        }
        if self
            .location
            .is_some_and(|location| location != specialist.location)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [&specialist.name, &specialist.title, &specialist.description]
                    .into_iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn learning_resources(&self, category: ResourceCategory) -> Vec<LearningResource>;
    async fn community_posts(&self, category: PostCategory) -> Vec<CommunityPost>;
    async fn success_stories(&self) -> Vec<SuccessStory>;
    async fn activities(&self, category: ActivityCategory) -> Vec<Activity>;
    async fn specialists(&self, query: &SpecialistQuery) -> Vec<Specialist>;
}

#[derive(Debug, Clone)]
pub struct StaticContentProvider {
    resources: Vec<LearningResource>,
    posts: Vec<CommunityPost>,
    stories: Vec<SuccessStory>,
    activities: Vec<Activity>,
    specialists: Vec<Specialist>,
}

impl Default for StaticContentProvider {
    fn default() -> Self {
        Self {
            resources: builtin_resources(),
            posts: builtin_posts(),
            stories: builtin_stories(),
            activities: builtin_activities(),
            specialists: builtin_specialists(),
        }
    }
}

#[async_trait]
impl ContentProvider for StaticContentProvider {
    async fn learning_resources(&self, category: ResourceCategory) -> Vec<LearningResource> {
        self.resources
            .iter()
            .filter(|r| category == ResourceCategory::All || r.category == category)
            .cloned()
            .collect()
    }

    async fn community_posts(&self, category: PostCategory) -> Vec<CommunityPost> {
        self.posts
            .iter()
            .filter(|p| category == PostCategory::All || p.tag.category() == category)
            .cloned()
            .collect()
    }

    async fn success_stories(&self) -> Vec<SuccessStory> {
        self.stories.clone()
    }

    async fn activities(&self, category: ActivityCategory) -> Vec<Activity> {
        self.activities
            .iter()
            .filter(|a| category == ActivityCategory::All || a.category == category)
            .cloned()
            .collect()
    }

    async fn specialists(&self, query: &SpecialistQuery) -> Vec<Specialist> {
        self.specialists
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect()
    }
}

fn langs(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn builtin_resources() -> Vec<LearningResource> {
    vec![
        LearningResource {
            title: "What is Autism?".into(),
            description: "Breaking myths in Cameroon".into(),
            format: ResourceFormat::Audio,
            category: ResourceCategory::Podcasts,
            languages: langs(&["English", "French"]),
        },
        LearningResource {
            title: "Sensory Play Guide".into(),
            description: "Activities for sensory development".into(),
            format: ResourceFormat::Pdf,
            category: ResourceCategory::Guides,
            languages: langs(&["French"]),
        },
        LearningResource {
            title: "Traditional & Modern Approaches".into(),
            description: "Combining healing practices".into(),
            format: ResourceFormat::Article,
            category: ResourceCategory::Stories,
            languages: langs(&["English", "Pidgin"]),
        },
    ]
}

fn builtin_posts() -> Vec<CommunityPost> {
    vec![
        CommunityPost {
            author: "Marie N.".into(),
            avatar: "MN".into(),
            posted: "2 days ago".into(),
            title: "Handling cultural stigma".into(),
            excerpt: "My child was recently diagnosed with autism, and I'm struggling with how to explain this to my extended family who have traditional beliefs...".into(),
            replies: 32,
            likes: 18,
            tag: PostTag::Question,
        },
        CommunityPost {
            author: "Jean P.".into(),
            avatar: "JP".into(),
            posted: "5 days ago".into(),
            title: "Activities that worked for us".into(),
            excerpt: "I wanted to share some activities that have really helped my 6-year-old son who has sensory processing differences. We've been doing these daily...".into(),
            replies: 18,
            likes: 24,
            tag: PostTag::Success,
        },
    ]
}

fn builtin_stories() -> Vec<SuccessStory> {
    vec![
        SuccessStory {
            title: "The Ndifon Family".into(),
            description: "How they helped their child thrive in school".into(),
            image_url: "https://picsum.photos/400/200".into(),
        },
        SuccessStory {
            title: "Adama's Journey".into(),
            description: "From non-verbal to confident communicator".into(),
            image_url: "https://picsum.photos/200/150".into(),
        },
        SuccessStory {
            title: "Bella's Progress".into(),
            description: "Finding strength through community support".into(),
            image_url: "https://picsum.photos/200/150".into(),
        },
    ]
}

fn builtin_activities() -> Vec<Activity> {
    vec![
        Activity {
            title: "Sensory Bottle".into(),
            description: "Create a calming sensory tool".into(),
            ages: "Ages 3-8".into(),
            duration_minutes: 20,
            category: ActivityCategory::Sensory,
        },
        Activity {
            title: "Taking Turns Game".into(),
            description: "Practice social skills with cards".into(),
            ages: "Ages 4-10".into(),
            duration_minutes: 30,
            category: ActivityCategory::Social,
        },
        Activity {
            title: "Sound Matching".into(),
            description: "Identify everyday sounds".into(),
            ages: "Ages 2-6".into(),
            duration_minutes: 15,
            category: ActivityCategory::Communication,
        },
    ]
}

fn builtin_specialists() -> Vec<Specialist> {
    vec![
        Specialist {
            name: "Dr. Mbarga".into(),
            title: "Psychologist".into(),
            description: "Specializes in autism assessment and behavioral therapy for children ages 2-12.".into(),
            kind: SpecialistKind::Psychologist,
            location: Location::Douala,
            languages: langs(&["French", "English"]),
            rating: 4.8,
            reviews: 24,
        },
        Specialist {
            name: "Bright Start Learning Center".into(),
            title: "Inclusive School".into(),
            description: "Special education programs and therapeutic services for children with diverse needs.".into(),
            kind: SpecialistKind::Education,
            location: Location::Yaounde,
            languages: langs(&["French", "English"]),
            rating: 4.6,
            reviews: 18,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn all_category_returns_everything() {
        let provider = StaticContentProvider::default();
        assert_eq!(provider.learning_resources(ResourceCategory::All).await.len(), 3);
        assert_eq!(provider.activities(ActivityCategory::All).await.len(), 3);
        assert_eq!(provider.community_posts(PostCategory::All).await.len(), 2);
        assert_eq!(provider.success_stories().await.len(), 3);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let provider = StaticContentProvider::default();
        let podcasts = provider.learning_resources(ResourceCategory::Podcasts).await;
        assert_eq!(podcasts.len(), 1);
        assert_eq!(podcasts[0].format, ResourceFormat::Audio);

        assert!(provider
            .learning_resources(ResourceCategory::Videos)
            .await
            .is_empty());

        let questions = provider.community_posts(PostCategory::Questions).await;
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].author, "Marie N.");

        let motor = provider.activities(ActivityCategory::Motor).await;
        assert!(motor.is_empty());
    }

    #[tokio::test]
    async fn specialist_query_combines_filters() {
        let provider = StaticContentProvider::default();

        let douala = provider
            .specialists(&SpecialistQuery {
                location: Some(Location::Douala),
                ..Default::default()
            })
            .await;
        assert_eq!(douala.len(), 1);
        assert_eq!(douala[0].name, "Dr. Mbarga");

        let search = provider
            .specialists(&SpecialistQuery {
                search: Some("SCHOOL".into()),
                ..Default::default()
            })
            .await;
        assert_eq!(search.len(), 1);
        assert_eq!(search[0].kind, SpecialistKind::Education);

        let none = provider
            .specialists(&SpecialistQuery {
                kind: Some(SpecialistKind::Speech),
                ..Default::default()
            })
            .await;
        assert!(none.is_empty());
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("Guides".parse::<ResourceCategory>(), Ok(ResourceCategory::Guides));
        assert_eq!("ALL".parse::<ActivityCategory>(), Ok(ActivityCategory::All));
        assert!("gossip".parse::<PostCategory>().is_err());
        assert_eq!("Yaoundé".parse::<Location>(), Ok(Location::Yaounde));
    }
}
