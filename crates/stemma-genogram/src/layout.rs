//! The genogram layout driver.
//!
//! Runs in five steps:
//!
//! 1. **Couple containers** — each mated pair becomes a single wide node so
//!    the ranked layout treats the couple as one unit and keeps the partners
//!    side by side.
//! 2. **Ranked layout** — the containers, solo persons, and deduplicated
//!    parent→child edges (one per couple→child, not two) go through the
//!    `stemma` pipeline with [`GenogramOrder`] as the ordering strategy.
//! 3. **Couple positioning** — partners are placed inside their container;
//!    the one whose parents sit further left takes the left slot.
//! 4. **Link routing** — relations are reconnected from containers to the
//!    real persons, with vertices through the couple midpoint and a shared
//!    fork point for multiple-birth groups.
//! 5. **Mate & identical links** — partner connections and the dashed
//!    link-to-link connections between identical siblings, which never enter
//!    the ranked graph (they would break the generation structure).

use rustc_hash::{FxHashMap, FxHashSet};
use stemma::{Config, InputEdge, InputNode, Point, RankDir};

use crate::crossings::{CrossingOptions, GenogramOrder};
use crate::error::GenogramError;
use crate::model::{
    ChildLink, GenogramLayout, IdenticalLink, LinkStyle, MateLink, MatePair, Person, PlacedPerson,
    Relation, Sizes,
};
use crate::routing;

struct CoupleInfo {
    container_id: String,
    a: String,
    b: String,
}

struct LinkInfo {
    parent: String,
    child: String,
    src_layout: String,
    tgt_layout: String,
}

pub fn layout_genogram(
    persons: &[Person],
    mate_pairs: &[MatePair],
    relations: &[Relation],
    sizes: &Sizes,
    style: LinkStyle,
) -> Result<GenogramLayout, GenogramError> {
    layout_genogram_with_options(
        persons,
        mate_pairs,
        relations,
        sizes,
        style,
        CrossingOptions::default(),
    )
}

pub fn layout_genogram_with_options(
    persons: &[Person],
    mate_pairs: &[MatePair],
    relations: &[Relation],
    sizes: &Sizes,
    style: LinkStyle,
    options: CrossingOptions,
) -> Result<GenogramLayout, GenogramError> {
    let mut person_by_id: FxHashMap<String, Person> = FxHashMap::default();
    for p in persons {
        if person_by_id.insert(p.id.clone(), p.clone()).is_some() {
            return Err(GenogramError::DuplicatePerson(p.id.clone()));
        }
    }
    let known = |id: &str| -> Result<(), GenogramError> {
        if person_by_id.contains_key(id) {
            Ok(())
        } else {
            Err(GenogramError::UnknownPerson(id.to_string()))
        }
    };
    for mp in mate_pairs {
        known(&mp.a)?;
        known(&mp.b)?;
    }
    for rel in relations {
        known(&rel.parent)?;
        known(&rel.child)?;
    }

    // Step 1: couple containers. A person joins at most one couple; later
    // pairs naming an already-coupled partner lay out as solo nodes.
    let extra_width = if style == LinkStyle::Orthogonal {
        sizes.symbol_width
    } else {
        0.0
    };
    let container_width = sizes.symbol_width * 2.0 + sizes.couple_gap + extra_width;

    let mut couples: Vec<CoupleInfo> = Vec::new();
    let mut container_of: FxHashMap<String, String> = FxHashMap::default();
    let mut mate_of: FxHashMap<String, String> = FxHashMap::default();
    let mut next_container = 0usize;
    for mp in mate_pairs {
        if container_of.contains_key(&mp.a) || container_of.contains_key(&mp.b) {
            continue;
        }
        let container_id = loop {
            let candidate = format!("_couple{next_container}");
            next_container += 1;
            if !person_by_id.contains_key(&candidate) {
                break candidate;
            }
        };
        container_of.insert(mp.a.clone(), container_id.clone());
        container_of.insert(mp.b.clone(), container_id.clone());
        mate_of.insert(mp.a.clone(), mp.b.clone());
        mate_of.insert(mp.b.clone(), mp.a.clone());
        couples.push(CoupleInfo {
            container_id,
            a: mp.a.clone(),
            b: mp.b.clone(),
        });
    }
    let layout_id =
        |person: &str| -> String { container_of.get(person).cloned().unwrap_or_else(|| person.to_string()) };

    // Canonical identical-sibling groups (smaller id names the group).
    let mut identical_group: FxHashMap<String, String> = FxHashMap::default();
    for p in persons {
        if let Some(other) = &p.identical {
            let group = if p.id < *other { p.id.clone() } else { other.clone() };
            identical_group.insert(p.id.clone(), group.clone());
            identical_group.insert(other.clone(), group);
        }
    }

    // Sibling groups key on parent layout node and the `multiple` value, so
    // twins from the same pregnancy share a key.
    let mut node_multiple_group: FxHashMap<String, String> = FxHashMap::default();
    for p in persons {
        let Some(multiple) = p.multiple else { continue };
        let parent_layout = p
            .mother
            .as_deref()
            .or(p.father.as_deref())
            .map(&layout_id)
            .unwrap_or_default();
        node_multiple_group.insert(layout_id(&p.id), format!("{parent_layout}|{multiple}"));
    }

    // Step 2: ranked layout over containers, solo persons, and deduplicated
    // layout edges.
    let mut nodes: Vec<InputNode> = Vec::new();
    for c in &couples {
        nodes.push(InputNode {
            id: c.container_id.clone(),
            width: container_width,
            height: sizes.symbol_height,
            rank: None,
        });
    }
    for p in persons {
        if !container_of.contains_key(&p.id) {
            nodes.push(InputNode {
                id: p.id.clone(),
                width: sizes.symbol_width,
                height: sizes.symbol_height,
                rank: None,
            });
        }
    }

    let mut link_infos: Vec<LinkInfo> = Vec::new();
    let mut edges: Vec<InputEdge> = Vec::new();
    let mut seen_edges: FxHashSet<String> = FxHashSet::default();
    let mut real_edges: Vec<(String, String)> = Vec::new();
    for rel in relations {
        let src_layout = layout_id(&rel.parent);
        let tgt_layout = layout_id(&rel.child);
        let key = format!("{src_layout}->{tgt_layout}");
        if seen_edges.insert(key.clone()) {
            edges.push(InputEdge {
                id: key,
                source: src_layout.clone(),
                target: tgt_layout.clone(),
                minlen: 1,
                label_width: 0.0,
                label_height: 0.0,
            });
            real_edges.push((src_layout.clone(), tgt_layout.clone()));
        }
        link_infos.push(LinkInfo {
            parent: rel.parent.clone(),
            child: rel.child.clone(),
            src_layout,
            tgt_layout,
        });
    }

    let config = Config {
        rank_dir: RankDir::TB,
        node_sep: sizes.symbol_gap,
        rank_sep: sizes.level_gap,
        ..Default::default()
    };
    let mut strategy = GenogramOrder {
        persons: person_by_id.clone(),
        identical_group,
        node_multiple_group,
        real_edges,
        options,
    };
    let placed = stemma::layout_with_strategy(&nodes, &edges, &config, &mut strategy)?;

    let mut centers: FxHashMap<String, Point> = FxHashMap::default();
    for n in &placed.nodes {
        centers.insert(n.id.clone(), Point { x: n.x, y: n.y });
    }

    // Step 3: partners into their containers. The partner averaging the
    // smaller parent x goes left; persons without placed parents sort last.
    let parent_x = |person: &str| -> f64 {
        let Some(p) = person_by_id.get(person) else {
            return f64::INFINITY;
        };
        let mut sum = 0.0;
        let mut count = 0usize;
        for parent in [&p.mother, &p.father].into_iter().flatten() {
            if let Some(c) = centers.get(&layout_id(parent)) {
                sum += c.x;
                count += 1;
            }
        }
        if count > 0 { sum / count as f64 } else { f64::INFINITY }
    };

    let inset = if style == LinkStyle::Orthogonal {
        sizes.symbol_width / 2.0
    } else {
        0.0
    };
    let mut person_centers: FxHashMap<String, Point> = FxHashMap::default();
    for c in &couples {
        let Some(center) = centers.get(&c.container_id).copied() else {
            continue;
        };
        let left_edge = center.x - container_width / 2.0;
        let (left, right) = if parent_x(&c.a) <= parent_x(&c.b) {
            (&c.a, &c.b)
        } else {
            (&c.b, &c.a)
        };
        person_centers.insert(
            left.clone(),
            Point {
                x: left_edge + inset + sizes.symbol_width / 2.0,
                y: center.y,
            },
        );
        person_centers.insert(
            right.clone(),
            Point {
                x: left_edge + inset + sizes.symbol_width + sizes.couple_gap
                    + sizes.symbol_width / 2.0,
                y: center.y,
            },
        );
    }
    for p in persons {
        if !container_of.contains_key(&p.id) {
            if let Some(c) = centers.get(&p.id) {
                person_centers.insert(p.id.clone(), *c);
            }
        }
    }

    // Step 4: routing. Multiple-birth groups under one couple share a fork
    // point at the average x of the group members.
    let container_ids: FxHashSet<&str> = couples.iter().map(|c| c.container_id.as_str()).collect();
    let twin_group_key = |src_layout: &str, child: &str| -> Option<String> {
        let multiple = person_by_id.get(child)?.multiple?;
        Some(format!("{src_layout}|{multiple}"))
    };

    let mut twin_members: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for li in &link_infos {
        if !container_ids.contains(li.src_layout.as_str()) {
            continue;
        }
        if let Some(key) = twin_group_key(&li.src_layout, &li.child) {
            twin_members.entry(key).or_default().push(li.child.clone());
        }
    }
    let mut twin_fork_x: FxHashMap<String, f64> = FxHashMap::default();
    for (key, members) in &twin_members {
        let unique: FxHashSet<&str> = members.iter().map(String::as_str).collect();
        if unique.len() < 2 {
            continue;
        }
        let sum: f64 = unique
            .iter()
            .filter_map(|id| person_centers.get(*id).map(|c| c.x))
            .sum();
        twin_fork_x.insert(key.clone(), sum / unique.len() as f64);
    }

    let mut child_links: Vec<ChildLink> = Vec::new();
    for li in &link_infos {
        let source_was_container = container_ids.contains(li.src_layout.as_str());
        let target_was_container = container_ids.contains(li.tgt_layout.as_str());
        let (Some(&source), Some(&target)) = (
            person_centers.get(&li.parent),
            person_centers.get(&li.child),
        ) else {
            continue;
        };

        let vertices = if source_was_container {
            let partner = mate_of
                .get(&li.parent)
                .and_then(|m| person_centers.get(m))
                .copied()
                .unwrap_or(source);
            let fork_x = twin_group_key(&li.src_layout, &li.child)
                .and_then(|key| twin_fork_x.get(&key).copied());
            routing::couple_source_vertices(style, source, partner, target, fork_x)
        } else if target_was_container {
            routing::solo_to_couple_vertices(style, source, sizes.symbol_height, target)
        } else {
            Vec::new()
        };

        child_links.push(ChildLink {
            parent: li.parent.clone(),
            child: li.child.clone(),
            vertices,
        });
    }

    // Step 5: mate links plus identical-sibling connections anchored part way
    // along the two child links.
    let mate_links: Vec<MateLink> = mate_pairs
        .iter()
        .map(|mp| MateLink {
            a: mp.a.clone(),
            b: mp.b.clone(),
        })
        .collect();

    let anchor_offset = sizes.level_gap
        / if style == LinkStyle::Orthogonal {
            8.0
        } else {
            4.0
        };
    let mut link_of_child: FxHashMap<&str, &ChildLink> = FxHashMap::default();
    for cl in &child_links {
        link_of_child.entry(cl.child.as_str()).or_insert(cl);
    }
    let link_polyline = |cl: &ChildLink| -> Option<Vec<Point>> {
        let src = person_centers.get(&cl.parent)?;
        let tgt = person_centers.get(&cl.child)?;
        let mut points = Vec::with_capacity(cl.vertices.len() + 2);
        points.push(*src);
        points.extend(cl.vertices.iter().copied());
        points.push(Point {
            x: tgt.x,
            y: tgt.y - sizes.symbol_height / 2.0,
        });
        Some(points)
    };

    let mut identical_links: Vec<IdenticalLink> = Vec::new();
    let mut seen_pairs: FxHashSet<(String, String)> = FxHashSet::default();
    for p in persons {
        let Some(other) = &p.identical else { continue };
        let pair = if p.id < *other {
            (p.id.clone(), other.clone())
        } else {
            (other.clone(), p.id.clone())
        };
        if !seen_pairs.insert(pair) {
            continue;
        }
        let (Some(link_a), Some(link_b)) = (
            link_of_child.get(p.id.as_str()),
            link_of_child.get(other.as_str()),
        ) else {
            continue;
        };
        let (Some(points_a), Some(points_b)) = (link_polyline(link_a), link_polyline(link_b))
        else {
            continue;
        };
        identical_links.push(IdenticalLink {
            child_a: p.id.clone(),
            child_b: other.clone(),
            ratio_a: routing::anchor_ratio(&points_a, anchor_offset),
            ratio_b: routing::anchor_ratio(&points_b, anchor_offset),
        });
    }

    let out_persons: Vec<PlacedPerson> = persons
        .iter()
        .filter_map(|p| {
            person_centers.get(&p.id).map(|c| PlacedPerson {
                id: p.id.clone(),
                x: c.x,
                y: c.y,
            })
        })
        .collect();

    tracing::debug!(
        persons = out_persons.len(),
        couples = couples.len(),
        links = child_links.len(),
        "genogram layout done"
    );

    Ok(GenogramLayout {
        persons: out_persons,
        child_links,
        mate_links,
        identical_links,
    })
}
