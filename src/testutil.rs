//! Shared fixtures for unit tests.

use chrono::{TimeZone, Utc};

use crate::fact::{Fact, Facts};
use crate::ident::Ident;

/// The canonical four-fact set used across comparator, sort, stream, and
/// view tests:
///
/// 0. `(people/bob, people/name, Bob, 2015-01-01, tx 1)`
/// 1. `(people/bob, people/color, red, 2015-01-01, tx 1)`
/// 2. `(people/sue, people/name, Sue, 2015-01-02, tx 2)`
/// 3. `(people/sue, people/color, blue, 2015-01-02, tx 2)`
pub fn canonical_facts() -> Facts {
    let e1 = Ident::new("people", "bob").unwrap();
    let e2 = Ident::new("people", "sue").unwrap();

    let a1 = Ident::new("people", "name").unwrap();
    let a2 = Ident::new("people", "color").unwrap();

    let v1 = Ident::scalar("Bob").unwrap();
    let v2 = Ident::scalar("Sue").unwrap();
    let v3 = Ident::scalar("red").unwrap();
    let v4 = Ident::scalar("blue").unwrap();

    let t0 = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2015, 1, 2, 0, 0, 0).unwrap();

    vec![
        Fact {
            entity: e1.clone(),
            attribute: a1.clone(),
            value: v1,
            time: t0,
            transaction: 1,
            added: true,
        },
        Fact {
            entity: e1,
            attribute: a2.clone(),
            value: v3,
            time: t0,
            transaction: 1,
            added: true,
        },
        Fact {
            entity: e2.clone(),
            attribute: a1,
            value: v2,
            time: t1,
            transaction: 2,
            added: true,
        },
        Fact {
            entity: e2,
            attribute: a2,
            value: v4,
            time: t1,
            transaction: 2,
            added: true,
        },
    ]
}
