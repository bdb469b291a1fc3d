//! Plan-vs-real effectiveness metrics (KPIs).
//!
//! Computes per-activity and project-level indicators from the activity
//! graph, comparing planned dates against real ones.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Start/End Variance | Signed business days between planned and real date |
//! | Effectiveness | 100, minus a proportional penalty per late business day |
//! | Overall Effectiveness | Mean effectiveness over completed activities |
//! | Status Buckets | Activity counts per status |
//! | On-Time / Late | Completed activities with end variance ≤ 0 / > 0 |

use chrono::NaiveDate;

use crate::models::{ActivityId, ActivityStatus, BusinessCalendar};

use super::ProjectGraph;

/// Plan-vs-real indicators for one activity.
///
/// Variances and effectiveness are only meaningful for completed
/// activities with both real dates recorded; elsewhere they are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityKpi {
    /// The measured activity.
    pub activity_id: ActivityId,
    /// Position in the route.
    pub order: u32,
    /// Current status.
    pub status: ActivityStatus,
    /// Planned duration in business days.
    pub planned_duration: u32,
    /// Real duration in business days (start through end, inclusive).
    pub actual_duration: u32,
    /// Business days the real start missed the planned start by
    /// (negative = started early).
    pub start_variance: i32,
    /// Business days the real end missed the planned end by
    /// (negative = finished early).
    pub end_variance: i32,
    /// 100 for on-time completion, reduced proportionally per late
    /// business day relative to the planned duration. One decimal.
    pub effectiveness: f64,
    /// Current delay counter.
    pub delay_days: u32,
}

/// Project-level KPI summary with the per-activity breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectKpi {
    /// Mean effectiveness over completed activities, one decimal; 0 with
    /// none completed.
    pub overall_effectiveness: f64,
    /// Total number of activities.
    pub total: usize,
    /// Completed with both real dates recorded.
    pub completed: usize,
    /// Currently `InProgress`.
    pub in_progress: usize,
    /// Still `Pending`.
    pub pending: usize,
    /// Currently `Delayed`.
    pub delayed: usize,
    /// Currently `Blocked`.
    pub blocked: usize,
    /// Completed activities whose end variance is ≤ 0.
    pub on_time: usize,
    /// Completed activities whose end variance is > 0.
    pub late: usize,
    /// Mean end variance over completed activities, one decimal.
    pub avg_end_variance: f64,
    /// Per-activity breakdown, in route order.
    pub activities: Vec<ActivityKpi>,
}

/// Signed business-day distance from `planned` to `actual`.
fn variance(planned: NaiveDate, actual: NaiveDate, calendar: &BusinessCalendar) -> i32 {
    if actual >= planned {
        calendar.count_business_days_between(planned, actual) as i32
    } else {
        -(calendar.count_business_days_between(actual, planned) as i32)
    }
}

/// Business days from `start` through `end`, both inclusive.
fn inclusive_span(start: NaiveDate, end: NaiveDate, calendar: &BusinessCalendar) -> u32 {
    calendar.count_business_days_between(start, end)
        + u32::from(calendar.is_business_day(start))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl ProjectKpi {
    /// Computes the full KPI set for a project graph.
    pub fn calculate(graph: &ProjectGraph, calendar: &BusinessCalendar) -> Self {
        let mut activities = Vec::with_capacity(graph.activities.len());

        for activity in &graph.activities {
            let mut start_variance = 0;
            let mut end_variance = 0;
            let mut effectiveness = 0.0;
            let mut actual_duration = 0;

            let real_dates = match (activity.actual_start, activity.actual_end) {
                (Some(start), Some(end)) if activity.status == ActivityStatus::Completed => {
                    Some((start, end))
                }
                _ => None,
            };

            if let Some((real_start, real_end)) = real_dates {
                start_variance = variance(activity.planned_start, real_start, calendar);
                end_variance = variance(activity.planned_end, real_end, calendar);
                actual_duration = inclusive_span(real_start, real_end, calendar);

                effectiveness = if end_variance <= 0 || activity.duration_business_days == 0 {
                    100.0
                } else {
                    let penalty =
                        end_variance as f64 / activity.duration_business_days as f64 * 100.0;
                    (100.0 - penalty).max(0.0)
                };
            }

            activities.push(ActivityKpi {
                activity_id: activity.id,
                order: activity.order,
                status: activity.status,
                planned_duration: activity.duration_business_days,
                actual_duration,
                start_variance,
                end_variance,
                effectiveness: round1(effectiveness),
                delay_days: activity.delay_days,
            });
        }

        let completed: Vec<&ActivityKpi> = activities
            .iter()
            .filter(|k| k.status == ActivityStatus::Completed && k.actual_duration > 0)
            .collect();

        let overall_effectiveness = if completed.is_empty() {
            0.0
        } else {
            completed.iter().map(|k| k.effectiveness).sum::<f64>() / completed.len() as f64
        };
        let avg_end_variance = if completed.is_empty() {
            0.0
        } else {
            completed.iter().map(|k| k.end_variance as f64).sum::<f64>() / completed.len() as f64
        };

        let count_status =
            |s: ActivityStatus| activities.iter().filter(|k| k.status == s).count();

        Self {
            overall_effectiveness: round1(overall_effectiveness),
            total: activities.len(),
            completed: completed.len(),
            in_progress: count_status(ActivityStatus::InProgress),
            pending: count_status(ActivityStatus::Pending),
            delayed: count_status(ActivityStatus::Delayed),
            blocked: count_status(ActivityStatus::Blocked),
            on_time: completed.iter().filter(|k| k.end_variance <= 0).count(),
            late: completed.iter().filter(|k| k.end_variance > 0).count(),
            avg_end_variance: round1(avg_end_variance),
            activities,
        }
    }
}
