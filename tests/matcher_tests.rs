//! Integration tests for pattern matching.

use pathquill::{segments, Path, PathError, Segments};

fn assert_matches(pattern: &str, candidates: Vec<Segments>) {
    let path = Path::new(pattern).unwrap();
    for candidate in candidates {
        assert!(
            path.matches(candidate.clone()).unwrap(),
            "{} should match {:?}",
            pattern,
            candidate
        );
    }
}

fn assert_unmatched(pattern: &str, candidates: Vec<Segments>) {
    let path = Path::new(pattern).unwrap();
    for candidate in candidates {
        assert!(
            !path.matches(candidate.clone()).unwrap(),
            "{} should not match {:?}",
            pattern,
            candidate
        );
    }
}

#[test]
fn test_match_bare_wildcard() {
    assert_matches(
        "*",
        vec![
            segments!["aa"],
            segments!["aa", "bb", "cc"],
            segments!["aa", "dd", "gg"],
        ],
    );
    assert_unmatched("*", vec![segments![]]);
}

#[test]
fn test_match_leading_and_inner_wildcards() {
    assert_matches(
        "*.a.b",
        vec![
            segments!["c", "a", "b"],
            segments!["k", "a", "b"],
            segments!["m", "a", "b"],
        ],
    );
    assert_matches(
        "a.*.k",
        vec![
            segments!["a", "b", "k"],
            segments!["a", "d", "k"],
            segments!["a", "c", "k"],
        ],
    );
}

#[test]
fn test_match_groups() {
    assert_matches(
        "a.*(b,d,m).k",
        vec![
            segments!["a", "b", "k"],
            segments!["a", "d", "k"],
            segments!["a", "m", "k"],
        ],
    );
    assert_matches(
        "a.*(b.c.d,d,m).k",
        vec![
            segments!["a", "b", "c", "d", "k"],
            segments!["a", "d", "k"],
            segments!["a", "m", "k"],
        ],
    );
    assert_matches(
        "a.*(b.*(c,k).d,d,m).k",
        vec![
            segments!["a", "b", "c", "d", "k"],
            segments!["a", "b", "k", "d", "k"],
            segments!["a", "d", "k"],
            segments!["a", "m", "k"],
        ],
    );
    assert_matches("*(aa,bb,bb.aa)", vec![segments!["bb", "aa"]]);
}

#[test]
fn test_match_exclusions() {
    assert_matches(
        "a.*(!b,d,m).*(!a,b)",
        vec![
            segments!["a", "o", "k"],
            segments!["a", "q", "k"],
            segments!["a", "c", "k"],
        ],
    );
    assert_matches(
        "a.*(!k,d,m).k",
        vec![
            segments!["a", "u", "k"],
            segments!["a", "o", "k"],
            segments!["a", "p", "k"],
        ],
    );
    assert_matches(
        "*(!aa,bb,bb.aa)",
        vec![segments!["xx"], segments!["yyy"], segments!["bb", "ss"]],
    );
    assert_matches("*(!aaa)", vec![segments!["bbb"]]);
    assert_unmatched("*(!aaa)", vec![segments!["aaa"]]);
}

#[test]
fn test_match_ranges() {
    assert_matches(
        "a.*[10:50].*(!a,b)",
        vec![
            segments!["a", 49, "s"],
            segments!["a", 10, "s"],
            segments!["a", 50, "s"],
        ],
    );
    assert_matches(
        "a.*[:50].*(!a,b)",
        vec![
            segments!["a", 49, "s"],
            segments!["a", 10, "s"],
            segments!["a", 50, "s"],
        ],
    );
    assert_matches("a.*[10:50].*", vec![segments!["a", 49, "s"]]);
    assert_unmatched("a.*[10:50].*", vec![segments!["a", 9, "s"], segments!["a", 51, "s"]]);
}

#[test]
fn test_match_trailing_range_absorbs() {
    assert_matches(
        "a.*[1:3]",
        vec![segments!["a", 1], segments!["a", 2, "x"], segments!["a", 3, "x", "y"]],
    );
    assert_unmatched("a.*[1:3]", vec![segments!["a"], segments!["a", 0, "x"]]);
}

#[test]
fn test_match_ignore_literals() {
    // candidate elements are parsed on their own, so `[[a.b.c]]` is the key `a.b.c`
    assert_matches(
        "a.*([[a.b.c]],[[c.b.d~]])",
        vec![segments!["a", "[[a.b.c]]"], segments!["a", "c.b.d~"]],
    );
    assert_matches("[[\\[aa,bb\\]]]", vec![segments!["[aa,bb]"]]);
    assert_matches("[[\\[aa,bb\\]   ]]", vec![segments!["[aa,bb]   "]]);
    assert_matches("[[   \\[aa,bb~\\]   ]]", vec![segments!["   [aa,bb~]   "]]);
}

#[test]
fn test_match_escaped_identifier() {
    assert_matches("a\\.\\*\\[1\\]", vec![segments!["a.*[1]"]]);
}

#[test]
fn test_match_trailing_wildcards() {
    assert_matches("aa.bb.*", vec![segments!["aa", "bb", "ccc"]]);
    assert_matches("a.*", vec![segments!["a", "b"], segments!["a", "b", "c"]]);
    assert_matches("aaa.products.0.*", vec![segments!["aaa", "products", "0", "aaa"]]);
    assert_unmatched("a.*", vec![segments!["a"], segments!["b"]]);
    assert_unmatched("aa.bb.*", vec![segments!["aa", "bb"]]);
    assert_unmatched("a.*.b", vec![segments!["a", "k", "b", "d"]]);
}

#[test]
fn test_match_expand() {
    assert_matches("aa~.ccc", vec![segments!["aa", "ccc"], segments!["aa12", "ccc"]]);
    assert_matches(
        "*(aa~,bb~).*",
        vec![segments!["aa12323", "asdasd"], segments!["bb12222", "asd"]],
    );
    assert_unmatched(
        "aa~.ccc",
        vec![segments!["a", "ccc"], segments!["aa"], segments!["aaasdd"]],
    );
}

#[test]
fn test_match_literal_paths() {
    assert_matches("a.b.c", vec![segments!["a", "b", "c"]]);
    assert_unmatched("a.b.c", vec![segments!["a", "b"]]);
    assert_unmatched("a", vec![segments!["c", "b"]]);
    assert_unmatched("bb", vec![segments!["bb", "cc"]]);
}

#[test]
fn test_match_backtracking_group() {
    assert_unmatched("aa.*(cc,bb).*.aa", vec![segments!["aa", "cc", "0", "bb"]]);
}

#[test]
fn test_match_from_string_candidates() {
    let path = Path::new("a.*(b,c).d").unwrap();
    assert!(path.matches("a.b.d").unwrap());
    assert!(path.matches(vec!["a", "c", "d"]).unwrap());
    assert!(!path.matches("a.x.d").unwrap());
}

#[test]
fn test_match_two_patterns_is_an_error() {
    let path = Path::new("a.*").unwrap();
    let result = path.matches("*.b");
    assert!(matches!(result, Err(PathError::WrongPathKind { .. })));
}

#[test]
fn test_match_alias_group() {
    let path = Path::new("a.*(b,c)").unwrap();
    assert!(path.match_alias_group("a.b", "x.y").unwrap());
    assert!(path.match_alias_group("x.y", "a.c").unwrap());
    assert!(!path.match_alias_group("x.y", "z").unwrap());
}

#[test]
fn test_match_alias_group_with_exclusion_prefers_higher_score() {
    let path = Path::new("*(!a.b)").unwrap();
    // equal scores: the name decides
    assert!(path.match_alias_group("c", "a").unwrap());
    assert!(!path.match_alias_group("a.b", "c").unwrap());
}

#[test]
fn test_match_record_scores() {
    let literal = Path::new("a.b").unwrap().match_record("a.b").unwrap();
    let wildcard = Path::new("a.*").unwrap().match_record("a.b").unwrap();
    assert!(literal.matched && wildcard.matched);
    assert!(literal.score > wildcard.score);
}

#[test]
fn test_match_results_are_stable_across_instances() {
    let first = Path::parse("x.*(!y).z").unwrap();
    let second = Path::new("x.*(!y).z").unwrap();
    for candidate in ["x.a.z", "x.y.z", "x.z"] {
        assert_eq!(
            first.matches(candidate).unwrap(),
            second.matches(candidate).unwrap()
        );
    }
}
