//! Post-load style repair for styled boxes.
//!
//! After markup passes through the parser, a styled box's `style` attribute
//! text is intact but the live declaration model behind it is empty, so every
//! accessor read would fall back to defaults. [`restore_text_box_styles`]
//! rehydrates the live model from the literal text. It is idempotent and
//! never fails.
//!
//! Older documents stored styling as presentational attributes on the
//! container or the box. [`migrate_legacy_attributes`] folds those into the
//! box's style text before restoration runs.

#[cfg(test)]
#[path = "restore_test.rs"]
mod restore_test;

use tracing::debug;

use crate::consts::TEXT_BOX;
use crate::doc::is_text_container;
use crate::mapping::{Facet, PRESENTATION_ATTRIBUTES};
use crate::markup::Element;
use crate::style::StyleDeclaration;

/// Rehydrate the live style model of every styled box in `root` from its
/// literal `style` text. Returns how many boxes were rehydrated.
///
/// Containers without a box and boxes without (or with blank) style text
/// are skipped. Malformed declarations are dropped one at a time.
pub fn restore_text_box_styles(root: &mut Element) -> usize {
    let mut restored = 0;
    root.walk_mut(&mut |el| {
        if !is_text_container(el) {
            return;
        }
        let Some(div) = el.first_descendant_mut(TEXT_BOX) else {
            debug!(id = el.id().unwrap_or_default(), "text container has no box");
            return;
        };
        let Some(text) = div.attribute("style").filter(|s| !s.trim().is_empty()) else {
            return;
        };
        let text = text.to_owned();
        div.style_mut().set_css_text(&text);
        restored += 1;
    });
    debug!(restored, "rehydrated text box styles");
    restored
}

/// Move presentational style attributes on styled-box containers (and on
/// their boxes) into the box's inline style. Returns how many containers
/// changed.
///
/// A property already declared inline keeps its inline value. An attribute
/// on the box beats the same attribute on the container. The attributes are
/// removed from both elements either way. A container without a box only
/// has its attributes removed.
pub fn migrate_legacy_attributes(root: &mut Element) -> usize {
    let mut migrated = 0;
    root.walk_mut(&mut |el| {
        if is_text_container(el) && migrate_container(el) {
            migrated += 1;
        }
    });
    if migrated > 0 {
        debug!(migrated, "migrated legacy text attributes");
    }
    migrated
}

fn migrate_container(container: &mut Element) -> bool {
    let on_container: Vec<(Facet, String)> = legacy_facts(container);
    strip_presentation(container);

    let Some(div) = container.first_descendant_mut(TEXT_BOX) else {
        return !on_container.is_empty();
    };
    let on_box = legacy_facts(div);
    strip_presentation(div);
    if on_container.is_empty() && on_box.is_empty() {
        return false;
    }

    let mut decls = StyleDeclaration::parse(div.attribute("style").unwrap_or_default());
    let mut added = false;
    for facet in Facet::ALL {
        let property = facet.css_property();
        if decls.contains(property) {
            continue;
        }
        let value = on_box
            .iter()
            .chain(on_container.iter())
            .find(|(f, _)| *f == facet)
            .map(|(_, v)| v);
        if let Some(value) = value {
            decls.set(property, &facet.to_style_value(value));
            added = true;
        }
    }
    if added {
        div.set_attribute("style", decls.css_text());
    }
    true
}

fn legacy_facts(el: &Element) -> Vec<(Facet, String)> {
    Facet::ALL
        .iter()
        .filter_map(|f| {
            el.attribute(f.attribute())
                .filter(|v| !v.trim().is_empty())
                .map(|v| (*f, v.to_owned()))
        })
        .collect()
}

fn strip_presentation(el: &mut Element) {
    for name in PRESENTATION_ATTRIBUTES {
        el.remove_attribute(name);
    }
}
