//! Demo content loaded at startup: a few readers and writers, a spread of
//! articles across categories, and some conversation under them.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use crate::{
    db_helpers::Storage,
    models::{NewArticle, NewAuthor, NewComment, NewUser},
    password::hash_password_argon2,
};

struct SeedUser {
    username: &'static str,
    name: &'static str,
    avatar_url: &'static str,
    bio: &'static str,
    author_description: Option<&'static str>,
}

struct SeedArticle {
    title: &'static str,
    excerpt: &'static str,
    content: &'static str,
    image_url: &'static str,
    days_old: i64,
    author: usize,
    category: &'static str,
    price: &'static str,
    read_time: i64,
    featured: bool,
    publication: Option<&'static str>,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        username: "sarahjohnson",
        name: "Sarah Johnson",
        avatar_url: "https://images.unsplash.com/photo-1494790108377-be9c29b29330",
        bio: "Technology journalist covering AI and the people building it.",
        author_description: Some("Senior technology correspondent"),
    },
    SeedUser {
        username: "michaelchen",
        name: "Michael Chen",
        avatar_url: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d",
        bio: "Science writer with a background in astrophysics.",
        author_description: Some("Science and space reporter"),
    },
    SeedUser {
        username: "amararoberts",
        name: "Amara Roberts",
        avatar_url: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80",
        bio: "Health and wellness editor.",
        author_description: Some("Health editor"),
    },
    SeedUser {
        username: "davidkim",
        name: "David Kim",
        avatar_url: "https://images.unsplash.com/photo-1500648767791-00dcc994a43e",
        bio: "Reads everything twice.",
        author_description: None,
    },
];

const ARTICLES: &[SeedArticle] = &[
    SeedArticle {
        title: "The Future of AI: Beyond the Hype",
        excerpt: "What large models can and cannot do, and why it matters for the next decade.",
        content: "<p>Artificial intelligence has moved from research labs into everyday tools.</p>\
                  <p>Behind the headlines, the real progress is quieter: better tooling, cheaper inference, and careful evaluation.</p>",
        image_url: "https://images.unsplash.com/photo-1677442136019-21780ecad995",
        days_old: 1,
        author: 0,
        category: "Technology",
        price: "0.10",
        read_time: 8,
        featured: true,
        publication: Some("Wired"),
    },
    SeedArticle {
        title: "A New Window on the Early Universe",
        excerpt: "The latest space telescope is rewriting what we know about the first galaxies.",
        content: "<p>Light that left its source thirteen billion years ago is arriving at a mirror in deep space.</p>\
                  <p>Astronomers are finding galaxies that formed far earlier than models predicted.</p>",
        image_url: "https://images.unsplash.com/photo-1462331940025-496dfbfc7564",
        days_old: 3,
        author: 1,
        category: "Science",
        price: "0.12",
        read_time: 6,
        featured: true,
        publication: Some("The Atlantic"),
    },
    SeedArticle {
        title: "Sleep Is the Best Performance Enhancer",
        excerpt: "Researchers keep finding the same answer to questions about focus and recovery.",
        content: "<p>Elite athletes are treating sleep like training.</p>\
                  <p>The evidence suggests the rest of us should too.</p>",
        image_url: "https://images.unsplash.com/photo-1541781774459-bb2af2f05b55",
        days_old: 5,
        author: 2,
        category: "Health",
        price: "0.15",
        read_time: 5,
        featured: false,
        publication: None,
    },
    SeedArticle {
        title: "Why Quantum Computers Need Better Error Correction",
        excerpt: "Qubits are fragile. Making them useful is an engineering problem as much as a physics one.",
        content: "<p>Every quantum computer today spends most of its effort fighting noise.</p>\
                  <p>Error-correcting codes promise a way out, at the cost of many physical qubits per logical one.</p>",
        image_url: "https://images.unsplash.com/photo-1635070041078-e363dbe005cb",
        days_old: 8,
        author: 0,
        category: "Technology",
        price: "0.12",
        read_time: 10,
        featured: false,
        publication: Some("MIT Technology Review"),
    },
    SeedArticle {
        title: "The Economics of Paying by the Article",
        excerpt: "Micropayments failed in the 1990s. The conditions that killed them have changed.",
        content: "<p>Subscriptions ask readers to commit to a publication. Most readers commit to stories.</p>\
                  <p>Paying a few cents per article lines up price with what readers actually value.</p>",
        image_url: "https://images.unsplash.com/photo-1554224155-6726b3ff858f",
        days_old: 12,
        author: 1,
        category: "Business",
        price: "0.10",
        read_time: 7,
        featured: true,
        publication: Some("The Economist"),
    },
];

/// (article index, commenting user index, age in hours, text)
const COMMENTS: &[(usize, usize, i64, &str)] = &[
    (0, 3, 2, "Refreshing to read something measured about AI for once."),
    (0, 1, 30, "The section on evaluation is spot on."),
    (1, 0, 5, "The images from this telescope are unreal."),
    (2, 3, 1, "Going to bed early tonight."),
    (4, 2, 50, "I would happily pay a dime for articles like this one."),
];

/// Loads the demo content unless storage already holds articles.
pub async fn seed_storage(storage: &dyn Storage) -> Result<()> {
    if !storage
        .list_articles()
        .await
        .context("Failed to inspect storage before seeding")?
        .is_empty()
    {
        tracing::info!("storage already has articles, skipping seed");
        return Ok(());
    }

    let now = Utc::now();

    let mut user_ids = Vec::with_capacity(USERS.len());
    let mut author_ids = Vec::with_capacity(USERS.len());
    for seed in USERS {
        let password = format!("{}-password", seed.username);
        let password = hash_password_argon2(password).await?;
        let user = storage
            .insert_user(NewUser {
                username: seed.username.to_string(),
                password,
                name: seed.name.to_string(),
                email: format!("{}@pennypress.example", seed.username),
                avatar_url: Some(seed.avatar_url.to_string()),
                bio: Some(seed.bio.to_string()),
            })
            .await
            .with_context(|| format!("Failed to seed user {}", seed.username))?;
        user_ids.push(user.id);

        if let Some(description) = seed.author_description {
            let author = storage
                .insert_author(NewAuthor {
                    user_id: user.id,
                    description: Some(description.to_string()),
                })
                .await
                .with_context(|| format!("Failed to seed author {}", seed.username))?;
            author_ids.push(author.id);
        }
    }

    let mut article_ids = Vec::with_capacity(ARTICLES.len());
    for seed in ARTICLES {
        let author_id = *author_ids
            .get(seed.author)
            .context("Seed article references an unknown author")?;
        let article = storage
            .insert_article(NewArticle {
                title: seed.title.to_string(),
                excerpt: seed.excerpt.to_string(),
                content: seed.content.to_string(),
                image_url: seed.image_url.to_string(),
                published_date: now - Duration::days(seed.days_old),
                author_id,
                category: seed.category.to_string(),
                price: seed.price.to_string(),
                read_time: seed.read_time,
                featured: seed.featured,
                publication: seed.publication.map(str::to_string),
            })
            .await
            .with_context(|| format!("Failed to seed article {:?}", seed.title))?;
        article_ids.push(article.id);
    }

    for &(article, user, hours_old, content) in COMMENTS {
        let (article_id, user_id) = match (article_ids.get(article), user_ids.get(user)) {
            (Some(&article_id), Some(&user_id)) => (article_id, user_id),
            _ => anyhow::bail!("Seed comment references an unknown article or user"),
        };
        storage
            .insert_comment(NewComment {
                article_id,
                user_id,
                content: content.to_string(),
                created_at: now - Duration::hours(hours_old),
            })
            .await
            .context("Failed to seed comment")?;
    }

    tracing::info!(
        users = user_ids.len(),
        authors = author_ids.len(),
        articles = article_ids.len(),
        comments = COMMENTS.len(),
        "seeded demo content"
    );
    Ok(())
}
