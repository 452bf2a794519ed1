use super::sample::MoodSample;
use chrono::NaiveDate;
use serde::Serialize;

const LOW_VALENCE_CUTOFF: f64 = -0.5;
const HIGH_VALENCE_CUTOFF: f64 = 0.5;

/// Fixed bucket definitions. Assignment only looks at valence; the arousal center is nominal.
const CENTERS: [ClusterCenter; 3] = [
    ClusterCenter {
        id: 0,
        valence: -1.0,
        arousal: 0.5,
        color: "green",
        tone: "felt low",
    },
    ClusterCenter {
        id: 1,
        valence: 0.0,
        arousal: 0.5,
        color: "blue",
        tone: "felt steady",
    },
    ClusterCenter {
        id: 2,
        valence: 1.0,
        arousal: 0.5,
        color: "amber",
        tone: "felt upbeat",
    },
];

struct ClusterCenter {
    id: u8,
    valence: f64,
    arousal: f64,
    color: &'static str,
    tone: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodCluster {
    pub id: u8,
    pub center_valence: f64,
    pub center_arousal: f64,
    pub days: Vec<NaiveDate>,
    pub color: &'static str,
}

impl MoodCluster {
    pub fn tone(&self) -> &'static str {
        CENTERS
            .get(usize::from(self.id))
            .map_or("", |center| center.tone)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodClusterReport {
    pub clusters: Vec<MoodCluster>,
    pub highlights: Vec<String>,
}

/// Threshold-based mood bucketing.
///
/// Samples are split into low, steady, and upbeat groups by valence alone. This is not an
/// iterative k-means: the centers never move and arousal does not influence assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoodClusterer;

impl MoodClusterer {
    pub fn cluster(samples: &[MoodSample]) -> Vec<MoodCluster> {
        let mut buckets: [Vec<NaiveDate>; 3] = Default::default();
        for sample in samples {
            buckets[bucket_for(sample.valence)].push(sample.date);
        }

        CENTERS
            .iter()
            .zip(buckets)
            .filter(|(_, days)| !days.is_empty())
            .map(|(center, days)| MoodCluster {
                id: center.id,
                center_valence: center.valence,
                center_arousal: center.arousal,
                days,
                color: center.color,
            })
            .collect()
    }

    pub fn highlights(clusters: &[MoodCluster]) -> Vec<String> {
        let mut highlights: Vec<String> = clusters
            .iter()
            .map(|cluster| {
                let count = cluster.days.len();
                let unit = if count == 1 { "day" } else { "days" };
                format!("{count} {unit} {}", cluster.tone())
            })
            .collect();

        if clusters.len() > 1 {
            // max_by_key keeps the last maximum, so reverse to prefer the lowest id on ties.
            if let Some(dominant) = clusters.iter().rev().max_by_key(|c| c.days.len()) {
                highlights.push(format!("Most frequent: {}", dominant.tone()));
            }
        }

        highlights
    }

    pub fn report(samples: &[MoodSample]) -> MoodClusterReport {
        let clusters = Self::cluster(samples);
        let highlights = Self::highlights(&clusters);
        MoodClusterReport {
            clusters,
            highlights,
        }
    }
}

fn bucket_for(valence: f64) -> usize {
    if valence <= LOW_VALENCE_CUTOFF {
        0
    } else if valence >= HIGH_VALENCE_CUTOFF {
        2
    } else {
        1
    }
}
