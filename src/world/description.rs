use crate::entities::container::ContainerState;
use crate::entities::item::Item;
use crate::world::catalog::ItemTypeIndex;

/// Human-readable summary of a container's direct contents, "nothing" when
/// empty. The full format uses articles and catalog plural names ("a bag,
/// 3 gold coins"); the compact format drops the articles. Pure function of
/// the current contents.
pub fn content_description(
    state: &ContainerState,
    catalog: &ItemTypeIndex,
    compact: bool,
) -> String {
    let children = state.items(false);
    if children.is_empty() {
        return "nothing".to_string();
    }
    let parts: Vec<String> = children
        .iter()
        .map(|child| describe_item(&child.borrow(), catalog, compact))
        .collect();
    parts.join(", ")
}

fn describe_item(item: &Item, catalog: &ItemTypeIndex, compact: bool) -> String {
    let Some(ty) = catalog.get(item.type_id) else {
        return format!("item of type {}", item.type_id.0);
    };
    if item.stackable && item.count > 1 {
        let plural = ty
            .plural
            .clone()
            .unwrap_or_else(|| format!("{}s", ty.name));
        return format!("{} {}", item.count, plural);
    }
    if compact {
        ty.name.clone()
    } else {
        format!("{} {}", article_for(&ty.name), ty.name)
    }
}

fn article_for(name: &str) -> &'static str {
    match name.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
