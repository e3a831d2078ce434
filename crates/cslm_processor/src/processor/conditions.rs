/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! `<choose>` predicate evaluation.

use std::borrow::Cow;

use cslm_core::{canonical_type, Entry, Position};
use cslm_style::{BranchCondition, Condition, Conditions, Context, Match, PositionTest, Test};

use crate::values::{self, date, number};

/// What a condition can see of the render in progress.
pub trait ConditionContext {
    fn entry(&self) -> &Entry;

    fn target(&self) -> Context;

    /// Cite position; `None` when rendering the bibliography.
    fn position(&self) -> Option<Position>;

    /// Whether the previous cite of this entry is within `near-note-distance`.
    fn near_note(&self) -> bool;

    /// Locator label of the cite (`page`, `chapter`, ...).
    fn locator_label(&self) -> Option<&str>;

    fn disambiguate(&self) -> bool;

    /// Variable value, including citation-level variables.
    fn variable(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Evaluate the condition of one `<if>` / `<else-if>` branch.
pub fn evaluate(condition: &BranchCondition, ctx: &dyn ConditionContext) -> bool {
    match condition {
        BranchCondition::Simple(condition) => evaluate_condition(condition, ctx),
        BranchCondition::Nested(conditions) => evaluate_nested(conditions, ctx),
    }
}

fn evaluate_nested(conditions: &Conditions, ctx: &dyn ConditionContext) -> bool {
    combine(
        conditions.match_mode,
        conditions
            .conditions
            .iter()
            .map(|c| evaluate_condition(c, ctx)),
    )
}

fn evaluate_condition(condition: &Condition, ctx: &dyn ConditionContext) -> bool {
    combine(
        condition.match_mode,
        condition.tests.iter().map(|t| evaluate_test(t, ctx)),
    )
}

/// Combine results under a match mode. `nand` holds when at least one
/// result is false.
fn combine(mode: Match, mut results: impl Iterator<Item = bool>) -> bool {
    match mode {
        Match::All => results.all(|r| r),
        Match::Any => results.any(|r| r),
        Match::None => !results.any(|r| r),
        Match::Nand => results.any(|r| !r),
    }
}

fn evaluate_test(test: &Test, ctx: &dyn ConditionContext) -> bool {
    let entry = ctx.entry();
    match test {
        Test::Type(name) => {
            let canonical = entry.csl_type();
            canonical == name || canonical == canonical_type(name) || entry.entry_type == *name
        }
        Test::Variable(name) => has_variable(ctx, name),
        Test::IsNumeric(name) => ctx
            .variable(name)
            .is_some_and(|value| number::is_numeric(&value)),
        Test::IsUncertainDate(name) => ctx
            .variable(name)
            .is_some_and(|value| date::is_uncertain(&value)),
        Test::IsMultiple(name) => match values::names(entry, name) {
            Some(list) => list.len() > 1,
            None => ctx
                .variable(name)
                .is_some_and(|value| number::is_multiple(&value)),
        },
        Test::HasDay(name) => parsed_date(ctx, name).is_some_and(|d| d.has_day()),
        Test::HasYearOnly(name) => parsed_date(ctx, name).is_some_and(|d| d.has_year_only()),
        Test::HasToMonthOrSeason(name) => {
            parsed_date(ctx, name).is_some_and(|d| d.has_month_or_season())
        }
        Test::Position(test) => position_matches(*test, ctx),
        Test::Locator(label) => ctx.locator_label() == Some(label.as_str()),
        Test::Disambiguate(expected) => ctx.disambiguate() == *expected,
        Test::Context(target) => ctx.target() == *target,
        Test::Genre(genre) => values::lookup(entry, "genre")
            .is_some_and(|value| value.eq_ignore_ascii_case(genre)),
    }
}

fn has_variable(ctx: &dyn ConditionContext, name: &str) -> bool {
    values::names(ctx.entry(), name).is_some() || ctx.variable(name).is_some()
}

fn parsed_date(ctx: &dyn ConditionContext, name: &str) -> Option<date::ParsedDate> {
    ctx.variable(name).and_then(|value| date::parse(&value))
}

fn position_matches(test: PositionTest, ctx: &dyn ConditionContext) -> bool {
    let Some(position) = ctx.position() else {
        return false;
    };
    let subsequent = position != Position::First;
    match test {
        PositionTest::First => position == Position::First,
        PositionTest::Subsequent => subsequent,
        PositionTest::Ibid => matches!(position, Position::Ibid | Position::IbidWithLocator),
        PositionTest::IbidWithLocator => position == Position::IbidWithLocator,
        PositionTest::NearNote => subsequent && ctx.near_note(),
        PositionTest::FarNote => subsequent && !ctx.near_note(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        entry: Entry,
        position: Option<Position>,
        near_note: bool,
        locator_label: Option<&'static str>,
    }

    impl ConditionContext for Fixture {
        fn entry(&self) -> &Entry {
            &self.entry
        }

        fn target(&self) -> Context {
            if self.position.is_some() {
                Context::Citation
            } else {
                Context::Bibliography
            }
        }

        fn position(&self) -> Option<Position> {
            self.position
        }

        fn near_note(&self) -> bool {
            self.near_note
        }

        fn locator_label(&self) -> Option<&str> {
            self.locator_label
        }

        fn disambiguate(&self) -> bool {
            false
        }

        fn variable(&self, name: &str) -> Option<Cow<'_, str>> {
            values::lookup(&self.entry, name)
        }
    }

    fn fixture(entry: Entry) -> Fixture {
        Fixture {
            entry,
            position: Some(Position::First),
            near_note: false,
            locator_label: None,
        }
    }

    fn simple(match_mode: Match, tests: Vec<Test>) -> BranchCondition {
        BranchCondition::Simple(Condition { match_mode, tests })
    }

    #[test]
    fn test_type_matches_bibtex_alias() {
        let ctx = fixture(Entry::new("a", "inproceedings"));
        assert!(evaluate(
            &simple(Match::All, vec![Test::Type("paper-conference".into())]),
            &ctx
        ));
        assert!(evaluate(
            &simple(Match::Any, vec![
                Test::Type("book".into()),
                Test::Type("inproceedings".into())
            ]),
            &ctx
        ));
    }

    #[test]
    fn test_match_modes() {
        let ctx = fixture(Entry::new("a", "book").with_field("title", "T"));
        let tests = vec![Test::Variable("title".into()), Test::Variable("volume".into())];
        assert!(!evaluate(&simple(Match::All, tests.clone()), &ctx));
        assert!(evaluate(&simple(Match::Any, tests.clone()), &ctx));
        assert!(!evaluate(&simple(Match::None, tests.clone()), &ctx));
        assert!(evaluate(&simple(Match::Nand, tests), &ctx));
        let both = vec![Test::Variable("title".into()), Test::Type("book".into())];
        assert!(!evaluate(&simple(Match::Nand, both), &ctx));
    }

    #[test]
    fn test_nested_conditions() {
        let ctx = fixture(
            Entry::new("a", "article-journal")
                .with_field("volume", "12")
                .with_field("issued", "2020-03"),
        );
        let condition = BranchCondition::Nested(Conditions {
            match_mode: Match::All,
            conditions: vec![
                Condition {
                    match_mode: Match::Any,
                    tests: vec![Test::Type("book".into()), Test::IsNumeric("volume".into())],
                },
                Condition {
                    match_mode: Match::None,
                    tests: vec![Test::HasDay("issued".into())],
                },
            ],
        });
        assert!(evaluate(&condition, &ctx));
    }

    #[test]
    fn test_numeric_and_uncertain() {
        let ctx = fixture(
            Entry::new("a", "book")
                .with_field("edition", "2nd")
                .with_field("volume", "Second")
                .with_field("issued", "circa 1850"),
        );
        let check = |test| evaluate(&simple(Match::All, vec![test]), &ctx);
        assert!(check(Test::IsNumeric("edition".into())));
        assert!(!check(Test::IsNumeric("volume".into())));
        assert!(check(Test::IsUncertainDate("issued".into())));
        assert!(check(Test::HasYearOnly("issued".into())));
    }

    #[test]
    fn test_positions() {
        let mut ctx = fixture(Entry::new("a", "book"));
        let check = |ctx: &Fixture, test| {
            evaluate(&simple(Match::All, vec![Test::Position(test)]), ctx)
        };
        assert!(check(&ctx, PositionTest::First));
        assert!(!check(&ctx, PositionTest::Subsequent));

        ctx.position = Some(Position::IbidWithLocator);
        ctx.near_note = true;
        assert!(check(&ctx, PositionTest::Subsequent));
        assert!(check(&ctx, PositionTest::Ibid));
        assert!(check(&ctx, PositionTest::IbidWithLocator));
        assert!(check(&ctx, PositionTest::NearNote));
        assert!(!check(&ctx, PositionTest::FarNote));

        ctx.position = None;
        assert!(!check(&ctx, PositionTest::First));
    }

    #[test]
    fn test_context_and_locator() {
        let mut ctx = fixture(Entry::new("a", "book"));
        ctx.locator_label = Some("chapter");
        assert!(evaluate(
            &simple(Match::All, vec![
                Test::Context(Context::Citation),
                Test::Locator("chapter".into())
            ]),
            &ctx
        ));
    }
}
