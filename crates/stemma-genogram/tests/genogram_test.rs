use stemma_genogram::{
    GenogramError, GenogramLayout, LinkStyle, MatePair, Person, Relation, Sizes, layout_genogram,
};

fn person(id: &str) -> Person {
    Person {
        id: id.to_string(),
        ..Default::default()
    }
}

fn child_of(id: &str, mother: &str, father: &str) -> Person {
    Person {
        id: id.to_string(),
        mother: Some(mother.to_string()),
        father: Some(father.to_string()),
        ..Default::default()
    }
}

fn mates(a: &str, b: &str) -> MatePair {
    MatePair {
        a: a.to_string(),
        b: b.to_string(),
    }
}

fn rel(parent: &str, child: &str) -> Relation {
    Relation {
        parent: parent.to_string(),
        child: child.to_string(),
    }
}

fn center(out: &GenogramLayout, id: &str) -> (f64, f64) {
    let p = out.persons.iter().find(|p| p.id == id).unwrap();
    (p.x, p.y)
}

fn family() -> (Vec<Person>, Vec<MatePair>, Vec<Relation>) {
    let persons = vec![person("f"), person("m"), child_of("c", "m", "f")];
    let pairs = vec![mates("f", "m")];
    let relations = vec![rel("f", "c"), rel("m", "c")];
    (persons, pairs, relations)
}

#[test]
fn couple_partners_share_a_rank_at_couple_gap_distance() {
    let sizes = Sizes::default();
    let (persons, pairs, relations) = family();
    let out = layout_genogram(&persons, &pairs, &relations, &sizes, LinkStyle::Fan).unwrap();

    let (fx, fy) = center(&out, "f");
    let (mx, my) = center(&out, "m");
    assert_eq!(fy, my);
    assert_eq!((mx - fx).abs(), sizes.symbol_width + sizes.couple_gap);
}

#[test]
fn children_are_placed_a_generation_below_their_parents() {
    let sizes = Sizes::default();
    let (persons, pairs, relations) = family();
    let out = layout_genogram(&persons, &pairs, &relations, &sizes, LinkStyle::Fan).unwrap();

    let (_, fy) = center(&out, "f");
    let (_, cy) = center(&out, "c");
    assert!(cy >= fy + sizes.symbol_height + sizes.level_gap);
}

#[test]
fn orthogonal_style_keeps_the_partner_distance() {
    let sizes = Sizes::default();
    let (persons, pairs, relations) = family();
    let out = layout_genogram(&persons, &pairs, &relations, &sizes, LinkStyle::Orthogonal).unwrap();

    let (fx, _) = center(&out, "f");
    let (mx, _) = center(&out, "m");
    // The container grows by a symbol width but the inset recenters the
    // partners, so their spacing does not change.
    assert_eq!((mx - fx).abs(), sizes.symbol_width + sizes.couple_gap);
}

#[test]
fn every_relation_gets_a_routed_child_link() {
    let (persons, pairs, relations) = family();
    let out = layout_genogram(&persons, &pairs, &relations, &Sizes::default(), LinkStyle::Fan)
        .unwrap();

    // Both parent relations survive even though the couple contributed a
    // single edge to the ranked layout.
    assert_eq!(out.child_links.len(), 2);
    for cl in &out.child_links {
        assert_eq!(cl.child, "c");
        assert_eq!(cl.vertices.len(), 3);
    }
    // Both routes drop through the couple midpoint.
    assert_eq!(out.child_links[0].vertices[0], out.child_links[1].vertices[0]);
}

#[test]
fn fan_routes_pass_through_the_couple_midpoint() {
    let (persons, pairs, relations) = family();
    let out = layout_genogram(&persons, &pairs, &relations, &Sizes::default(), LinkStyle::Fan)
        .unwrap();

    let (fx, fy) = center(&out, "f");
    let (mx, _) = center(&out, "m");
    let first = out.child_links[0].vertices[0];
    assert_eq!(first.x, (fx + mx) / 2.0);
    assert_eq!(first.y, fy);
}

#[test]
fn orthogonal_routes_are_axis_aligned() {
    let (persons, pairs, relations) = family();
    let out = layout_genogram(
        &persons,
        &pairs,
        &relations,
        &Sizes::default(),
        LinkStyle::Orthogonal,
    )
    .unwrap();

    for cl in &out.child_links {
        assert_eq!(cl.vertices.len(), 4);
        for pair in cl.vertices.windows(2) {
            let horizontal = pair[0].y == pair[1].y;
            let vertical = pair[0].x == pair[1].x;
            assert!(horizontal || vertical, "diagonal segment in {:?}", cl);
        }
    }
}

#[test]
fn solo_parent_routes_into_a_coupled_child() {
    let mut persons = vec![person("p"), person("a"), person("b")];
    persons[1].mother = Some("p".to_string());
    let pairs = vec![mates("a", "b")];
    let relations = vec![rel("p", "a")];
    let out = layout_genogram(&persons, &pairs, &relations, &Sizes::default(), LinkStyle::Fan)
        .unwrap();

    let cl = &out.child_links[0];
    assert_eq!(cl.parent, "p");
    assert_eq!(cl.child, "a");
    assert_eq!(cl.vertices.len(), 2);
    let (px, py) = center(&out, "p");
    let (ax, ay) = center(&out, "a");
    assert_eq!(cl.vertices[0].x, px);
    assert_eq!(cl.vertices[1].x, ax);
    assert_eq!(cl.vertices[0].y, (py + ay) / 2.0);
}

#[test]
fn twins_share_a_fork_point() {
    let sizes = Sizes::default();
    let mut t1 = child_of("t1", "m", "f");
    t1.multiple = Some(1);
    let mut t2 = child_of("t2", "m", "f");
    t2.multiple = Some(1);
    let persons = vec![person("f"), person("m"), t1, t2];
    let pairs = vec![mates("f", "m")];
    let relations = vec![rel("f", "t1"), rel("m", "t1"), rel("f", "t2"), rel("m", "t2")];
    let out = layout_genogram(&persons, &pairs, &relations, &sizes, LinkStyle::Fan).unwrap();

    let (x1, _) = center(&out, "t1");
    let (x2, _) = center(&out, "t2");
    let fork_x = (x1 + x2) / 2.0;
    for cl in &out.child_links {
        let last = cl.vertices.last().unwrap();
        assert_eq!(last.x, fork_x, "link to {} misses the fork", cl.child);
    }
}

#[test]
fn multiple_birth_siblings_stay_adjacent() {
    let sizes = Sizes::default();
    let mut t1 = child_of("t1", "m", "f");
    t1.multiple = Some(1);
    t1.dob = Some("2001-03-01".to_string());
    let mut t2 = child_of("t2", "m", "f");
    t2.multiple = Some(1);
    t2.dob = Some("2001-03-01".to_string());
    let mut solo = child_of("s", "m", "f");
    solo.dob = Some("1999-06-15".to_string());
    let persons = vec![person("f"), person("m"), t1, solo, t2];
    let pairs = vec![mates("f", "m")];
    let relations = vec![
        rel("m", "t1"),
        rel("m", "s"),
        rel("m", "t2"),
        rel("f", "t1"),
        rel("f", "s"),
        rel("f", "t2"),
    ];
    let out = layout_genogram(&persons, &pairs, &relations, &sizes, LinkStyle::Fan).unwrap();

    let (sx, _) = center(&out, "s");
    let (x1, _) = center(&out, "t1");
    let (x2, _) = center(&out, "t2");
    // No other sibling sits between the twins.
    assert!(sx < x1.min(x2) || sx > x1.max(x2));
}

#[test]
fn identical_twins_get_an_anchor_link() {
    let mut t1 = child_of("t1", "m", "f");
    t1.multiple = Some(1);
    t1.identical = Some("t2".to_string());
    let mut t2 = child_of("t2", "m", "f");
    t2.multiple = Some(1);
    t2.identical = Some("t1".to_string());
    let persons = vec![person("f"), person("m"), t1, t2];
    let pairs = vec![mates("f", "m")];
    let relations = vec![rel("f", "t1"), rel("m", "t1"), rel("f", "t2"), rel("m", "t2")];
    let out = layout_genogram(&persons, &pairs, &relations, &Sizes::default(), LinkStyle::Fan)
        .unwrap();

    assert_eq!(out.identical_links.len(), 1);
    let il = &out.identical_links[0];
    assert!(il.ratio_a >= 0.01 && il.ratio_a <= 0.99);
    assert!(il.ratio_b >= 0.01 && il.ratio_b <= 0.99);
    // The two anchors sit the same way along symmetric routes.
    assert!((il.ratio_a - il.ratio_b).abs() < 1e-6);
}

#[test]
fn mate_links_mirror_the_input_pairs() {
    let (persons, pairs, relations) = family();
    let out = layout_genogram(&persons, &pairs, &relations, &Sizes::default(), LinkStyle::Fan)
        .unwrap();
    assert_eq!(out.mate_links.len(), 1);
    assert_eq!(out.mate_links[0].a, "f");
    assert_eq!(out.mate_links[0].b, "m");
}

#[test]
fn a_person_joins_at_most_one_couple() {
    let persons = vec![person("a"), person("b"), person("c")];
    let pairs = vec![mates("a", "b"), mates("b", "c")];
    let out = layout_genogram(&persons, &pairs, &[], &Sizes::default(), LinkStyle::Fan).unwrap();

    // b is already coupled with a, so c lays out solo; everyone still gets
    // a position and both mate links are reported.
    assert_eq!(out.persons.len(), 3);
    assert_eq!(out.mate_links.len(), 2);
    let (ay, by, cy) = (center(&out, "a").1, center(&out, "b").1, center(&out, "c").1);
    assert_eq!(ay, by);
    assert_eq!(by, cy);
}

#[test]
fn unknown_ids_in_relations_are_rejected() {
    let persons = vec![person("a")];
    let err = layout_genogram(
        &persons,
        &[],
        &[rel("a", "ghost")],
        &Sizes::default(),
        LinkStyle::Fan,
    )
    .unwrap_err();
    assert!(matches!(err, GenogramError::UnknownPerson(id) if id == "ghost"));
}

#[test]
fn duplicate_person_ids_are_rejected() {
    let persons = vec![person("a"), person("a")];
    let err = layout_genogram(&persons, &[], &[], &Sizes::default(), LinkStyle::Fan).unwrap_err();
    assert!(matches!(err, GenogramError::DuplicatePerson(id) if id == "a"));
}

#[test]
fn person_metadata_deserializes_from_json() {
    let p: Person = serde_json::from_str(
        r#"{ "id": "t1", "mother": "m", "multiple": 1, "identical": "t2" }"#,
    )
    .unwrap();
    assert_eq!(p.id, "t1");
    assert_eq!(p.mother.as_deref(), Some("m"));
    assert_eq!(p.multiple, Some(1));
    assert_eq!(p.father, None);
}
