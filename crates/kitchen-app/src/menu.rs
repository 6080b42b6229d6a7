//! Game content: dishes, tutorial and display helpers

use kitchen_core::Difficulty;

/// A dish that can appear in an order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoodItem {
    pub id: usize,
    pub name: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
}

/// Dishes in item-slot order
pub static FOOD_ITEMS: [FoodItem; 4] = [
    FoodItem { id: 0, name: "Burger", emoji: "🍔", color: "#FF9F43" },
    FoodItem { id: 1, name: "Pizza", emoji: "🍕", color: "#FECA57" },
    FoodItem { id: 2, name: "Sushi", emoji: "🍣", color: "#54A0FF" },
    FoodItem { id: 3, name: "Ice Cream", emoji: "🍨", color: "#FF6B6B" },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TutorialStep {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub static TUTORIAL_STEPS: [TutorialStep; 5] = [
    TutorialStep {
        title: "Connect Wallet",
        description: "Connect your Web3 wallet to play the game",
        icon: "🔗",
    },
    TutorialStep {
        title: "Create Encrypted Order",
        description: "As the head chef, create orders with hidden ingredient counts",
        icon: "🔒",
    },
    TutorialStep {
        title: "Communicate Ingredients",
        description: "Describe the hidden order to your team without revealing details",
        icon: "🗣️",
    },
    TutorialStep {
        title: "Cook Together",
        description: "Work with your team to prepare the dishes",
        icon: "👨‍🍳",
    },
    TutorialStep {
        title: "Complete Order",
        description: "Submit the completed order to earn points",
        icon: "✅",
    },
];

/// `0x1234...cdef` style abbreviation of a 42-character address
pub fn short_address(address: &str) -> String {
    match (address.get(..6), address.get(38..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}

pub fn difficulty_stars(difficulty: Difficulty) -> String {
    "⭐".repeat(difficulty.level() as usize)
}

/// Pair each decoded quantity with its dish. Extra quantities are dropped.
pub fn label_items(items: &[i64]) -> Vec<(&'static FoodItem, i64)> {
    FOOD_ITEMS.iter().zip(items.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_difficulty_stars() {
        assert_eq!(difficulty_stars(Difficulty::new(3).unwrap()), "⭐⭐⭐");
    }

    #[test]
    fn test_label_items() {
        let labelled = label_items(&[2, 0, 1]);
        assert_eq!(labelled.len(), 3);
        assert_eq!(labelled[0].0.name, "Burger");
        assert_eq!(labelled[2], (&FOOD_ITEMS[2], 1));
    }
}
