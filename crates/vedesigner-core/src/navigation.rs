//! Route computation between wizard pages.
//!
//! The fine-planning steps form a dynamic sequence between two fixed
//! boundaries: the step list before the first step and the finish page after
//! the last one. [`StepNavigator`] is rebuilt from `Plan.steps` on every
//! load and holds nothing beyond that. [`WizardRoutes`] puts the static pages
//! in front of it.
//!
//! A key that is not (or no longer) part of the sequence resolves to the
//! boundary in the direction of travel.

use std::fmt;

use serde::Serialize;

use crate::{
    form::{PageKind, STATIC_PAGES},
    models::{Plan, Step},
};

/// How fine-planning steps are identified in routes and progress keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKeyScheme {
    /// Server id, falling back to the display name until the step has one.
    #[default]
    Id,
    /// Display name only. Kept for plans written by the name-keyed wizard;
    /// renaming a step breaks its links and progress entry.
    DisplayName,
}

impl StepKeyScheme {
    /// Key of `step` under this scheme.
    pub fn step_key<'a>(&self, step: &'a Step) -> &'a str {
        match self {
            StepKeyScheme::Id => step.key(),
            StepKeyScheme::DisplayName => &step.name,
        }
    }
}

/// A step as seen by navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    /// Identity key under the navigator's scheme
    pub id: String,
    pub display_name: String,
    /// Page reference of the step, usable wherever a page is parsed
    pub link: String,
}

impl StepDescriptor {
    pub fn page(&self) -> PageKind {
        PageKind::Step(self.id.clone())
    }
}

/// Destination of a navigation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "target", rename_all = "snake_case")]
pub enum Route {
    Page(PageKind),
    Step(StepDescriptor),
    /// The step list, boundary before the first step
    StepList,
    /// The finish page, boundary after the last step
    Finish,
    /// The plan overview, outside the wizard
    Overview,
}

impl Route {
    /// The page this route opens, if it is a wizard page.
    pub fn page(&self) -> Option<PageKind> {
        match self {
            Route::Page(kind) => Some(kind.clone()),
            Route::Step(step) => Some(step.page()),
            Route::StepList => Some(PageKind::StepNames),
            Route::Finish | Route::Overview => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Page(kind) => write!(f, "{kind}"),
            Route::Step(step) => f.write_str(&step.link),
            Route::StepList => write!(f, "{}", PageKind::StepNames),
            Route::Finish => f.write_str("finish"),
            Route::Overview => f.write_str("overview"),
        }
    }
}

/// Ordered step descriptors of one plan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepNavigator {
    scheme: StepKeyScheme,
    steps: Vec<StepDescriptor>,
}

impl StepNavigator {
    pub fn from_plan(plan: &Plan, scheme: StepKeyScheme) -> Self {
        let steps = plan
            .steps
            .iter()
            .map(|step| {
                let id = scheme.step_key(step).to_string();
                StepDescriptor {
                    link: PageKind::Step(id.clone()).to_string(),
                    display_name: step.name.clone(),
                    id,
                }
            })
            .collect();
        Self { scheme, steps }
    }

    pub fn scheme(&self) -> StepKeyScheme {
        self.scheme
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == key)
    }

    /// The first step, or the finish page for a plan without steps.
    pub fn first(&self) -> Route {
        self.steps
            .first()
            .map_or(Route::Finish, |step| Route::Step(step.clone()))
    }

    /// The last step, or the step list for a plan without steps.
    pub fn last(&self) -> Route {
        self.steps
            .last()
            .map_or(Route::StepList, |step| Route::Step(step.clone()))
    }

    pub fn next(&self, key: &str) -> Route {
        match self.position(key) {
            Some(index) if index + 1 < self.steps.len() => {
                Route::Step(self.steps[index + 1].clone())
            }
            _ => Route::Finish,
        }
    }

    pub fn prev(&self, key: &str) -> Route {
        match self.position(key) {
            Some(index) if index > 0 => Route::Step(self.steps[index - 1].clone()),
            _ => Route::StepList,
        }
    }
}

/// The full page sequence: static pages, then the plan's steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WizardRoutes {
    navigator: StepNavigator,
}

impl WizardRoutes {
    pub fn from_plan(plan: &Plan, scheme: StepKeyScheme) -> Self {
        Self {
            navigator: StepNavigator::from_plan(plan, scheme),
        }
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    /// Every page in wizard order.
    pub fn pages(&self) -> Vec<PageKind> {
        STATIC_PAGES
            .iter()
            .cloned()
            .chain(self.navigator.steps().iter().map(StepDescriptor::page))
            .collect()
    }

    pub fn next(&self, page: &PageKind) -> Route {
        if let PageKind::Step(key) = page {
            return self.navigator.next(key);
        }
        match static_index(page) {
            Some(index) if index + 1 < STATIC_PAGES.len() => {
                Route::Page(STATIC_PAGES[index + 1].clone())
            }
            _ => self.navigator.first(),
        }
    }

    pub fn prev(&self, page: &PageKind) -> Route {
        if let PageKind::Step(key) = page {
            return self.navigator.prev(key);
        }
        match static_index(page) {
            Some(index) if index > 0 => Route::Page(STATIC_PAGES[index - 1].clone()),
            _ => Route::Overview,
        }
    }

    /// Where "back" from the finish page leads.
    pub fn before_finish(&self) -> Route {
        self.navigator.last()
    }
}

fn static_index(page: &PageKind) -> Option<usize> {
    STATIC_PAGES.iter().position(|p| p == page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(steps: &[(Option<&str>, &str)]) -> Plan {
        Plan {
            steps: steps
                .iter()
                .map(|(id, name)| Step {
                    id: id.map(str::to_string),
                    name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Plan::empty("p1")
        }
    }

    fn abc() -> StepNavigator {
        StepNavigator::from_plan(
            &plan(&[(Some("a"), "A"), (Some("b"), "B"), (Some("c"), "C")]),
            StepKeyScheme::Id,
        )
    }

    fn step_id(route: Route) -> String {
        match route {
            Route::Step(step) => step.id,
            other => panic!("expected a step, got {other}"),
        }
    }

    #[test]
    fn test_next_and_prev_inside_sequence() {
        let nav = abc();
        assert_eq!(step_id(nav.next("b")), "c");
        assert_eq!(step_id(nav.prev("b")), "a");
    }

    #[test]
    fn test_boundaries() {
        let nav = abc();
        assert_eq!(nav.next("c"), Route::Finish);
        assert_eq!(nav.prev("a"), Route::StepList);
    }

    #[test]
    fn test_unknown_key_fails_closed() {
        let nav = abc();
        assert_eq!(nav.next("renamed"), Route::Finish);
        assert_eq!(nav.prev("renamed"), Route::StepList);
        assert_eq!(StepNavigator::default().next("anything"), Route::Finish);
    }

    #[test]
    fn test_display_name_scheme() {
        let plan = plan(&[(Some("a"), "A"), (None, "B")]);
        let by_name = StepNavigator::from_plan(&plan, StepKeyScheme::DisplayName);
        assert_eq!(step_id(by_name.next("A")), "B");
        assert_eq!(by_name.next("a"), Route::Finish);

        let by_id = StepNavigator::from_plan(&plan, StepKeyScheme::Id);
        assert_eq!(step_id(by_id.next("a")), "B");
        assert_eq!(by_id.steps()[1].link, "step:B");
    }

    #[test]
    fn test_static_sequence_flows_into_steps() {
        let routes = WizardRoutes::from_plan(
            &plan(&[(Some("a"), "A"), (Some("b"), "B")]),
            StepKeyScheme::Id,
        );
        assert_eq!(
            routes.next(&PageKind::Name),
            Route::Page(PageKind::Institutions)
        );
        assert_eq!(step_id(routes.next(&PageKind::StepNames)), "a");
        assert_eq!(routes.prev(&PageKind::Name), Route::Overview);
        assert_eq!(
            routes.prev(&PageKind::Step("a".to_string())).page(),
            Some(PageKind::StepNames)
        );
        assert_eq!(step_id(routes.before_finish()), "b");
        assert_eq!(routes.pages().len(), STATIC_PAGES.len() + 2);
    }

    #[test]
    fn test_step_list_without_steps_leads_to_finish() {
        let routes = WizardRoutes::from_plan(&Plan::empty("p1"), StepKeyScheme::Id);
        assert_eq!(routes.next(&PageKind::StepNames), Route::Finish);
        assert_eq!(routes.before_finish(), Route::StepList);
    }
}
