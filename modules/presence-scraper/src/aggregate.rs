// Engagement aggregation: raw per-post counts → uniform EngagementMetrics.

use presence_common::{EngagementMetrics, Post, ProfileStats};

/// What an engagement rate is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenominatorBasis {
    /// The profile's follower count, same for every post.
    Followers,
    /// Each post's own view count.
    Views,
}

/// Reduce fetched posts to totals and an average engagement rate.
///
/// Totals are exact sums over the posts given, saturating at `u64::MAX`.
/// The average is the mean of per-post
/// `(likes + reposts + replies) / denominator * 100`, where a post with no
/// engagement counts or no usable denominator contributes 0 but still counts
/// toward the mean. No posts → 0.
pub fn aggregate(posts: &[Post], profile: &ProfileStats, basis: DenominatorBasis) -> EngagementMetrics {
    let total_likes = posts.iter().filter_map(|p| p.likes).fold(0u64, u64::saturating_add);
    let total_reposts = posts.iter().filter_map(|p| p.reposts).fold(0u64, u64::saturating_add);
    let total_replies = posts.iter().filter_map(|p| p.replies).fold(0u64, u64::saturating_add);

    let avg_engagement_rate = if posts.is_empty() {
        0.0
    } else {
        let sum: f64 = posts
            .iter()
            .map(|p| post_rate(p, profile.followers, basis))
            .sum();
        round4(sum / posts.len() as f64)
    };

    EngagementMetrics {
        followers_count: profile.followers.unwrap_or(0),
        total_likes,
        total_reposts,
        total_replies,
        posts_considered: posts.len(),
        avg_engagement_rate,
    }
}

fn post_rate(post: &Post, followers: Option<u64>, basis: DenominatorBasis) -> f64 {
    let denominator = match basis {
        DenominatorBasis::Followers => followers,
        DenominatorBasis::Views => post.views,
    };
    match (post.engagement(), denominator) {
        (Some(engagement), Some(denom)) if denom > 0 => engagement as f64 / denom as f64 * 100.0,
        _ => 0.0,
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
