//! Static tool catalog: tools, tag groups, background presets, product
//! categories and sample images.
//!
//! Catalog data is fixed at compile time and never mutated; the UI only
//! reads it.

/// Sidebar grouping for tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCategory {
    /// Product-on-body tools (try-on, wearables).
    ProductOnBody,
    /// One-image-to-many variation tools.
    Variations,
    /// Free-form creation tools.
    Creation,
    /// Enterprise batch tools.
    Enterprise,
    /// Custom one-off tools.
    Custom,
}

impl ToolCategory {
    /// Human-readable section label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProductOnBody => "Product On Body",
            Self::Variations => "One Image, Many Shots",
            Self::Creation => "Image Creation",
            Self::Enterprise => "Enterprise",
            Self::Custom => "Custom Tools",
        }
    }

    /// All categories in sidebar order.
    pub fn all() -> &'static [ToolCategory] {
        &[
            Self::ProductOnBody,
            Self::Variations,
            Self::Creation,
            Self::Enterprise,
            Self::Custom,
        ]
    }
}

/// Dispatch family a tool belongs to. Determines validation rules, the
/// instruction template and the pinned model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFamily {
    /// Image-to-image variation: keep clothing/style, vary pose/action.
    Variation,
    /// Text-to-image creation, no source image.
    Creative,
    /// Place a product into a new background scene.
    BackgroundSwap,
    /// Remove watermarks/overlaid text from a source image.
    WatermarkRemoval,
}

/// One named image-editing capability exposed in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Tool {
    /// Stable identifier used for dispatch.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Sidebar category.
    pub category: ToolCategory,
    /// Dispatch family.
    pub family: ToolFamily,
    /// One-line description.
    pub description: &'static str,
    /// Marked "new" in the sidebar.
    pub is_new: bool,
    /// Marked "hot"/upgraded in the sidebar.
    pub is_hot: bool,
}

const fn tool(
    id: &'static str,
    name: &'static str,
    category: ToolCategory,
    family: ToolFamily,
    description: &'static str,
) -> Tool {
    Tool {
        id,
        name,
        category,
        family,
        description,
        is_new: false,
        is_hot: false,
    }
}

const fn hot(mut t: Tool) -> Tool {
    t.is_hot = true;
    t
}

const fn new_tool(mut t: Tool) -> Tool {
    t.is_new = true;
    t
}

/// The full tool catalog, in sidebar order.
pub static TOOLS: &[Tool] = &[
    // Product on body
    tool(
        "try-on",
        "Garment Try-On",
        ToolCategory::ProductOnBody,
        ToolFamily::Variation,
        "Put a garment photo onto a model in one step",
    ),
    tool(
        "wear-all",
        "Wear Anything",
        ToolCategory::ProductOnBody,
        ToolFamily::Variation,
        "Shoes, bags and other products worn in one step",
    ),
    hot(tool(
        "mix-match",
        "Mix & Match",
        ToolCategory::ProductOnBody,
        ToolFamily::Variation,
        "Combine pieces freely into a full model shot",
    )),
    // Variations
    tool(
        "bg-swap-model",
        "Model Background Swap",
        ToolCategory::Variations,
        ToolFamily::Variation,
        "Same product, new model and background",
    ),
    tool(
        "fission",
        "Pose Variations",
        ToolCategory::Variations,
        ToolFamily::Variation,
        "Split one shot into a set of similar poses",
    ),
    // Creation
    hot(tool(
        "creative",
        "Creative Generation",
        ToolCategory::Creation,
        ToolFamily::Creative,
        "Generate the model shot you imagine",
    )),
    // Enterprise
    tool(
        "batch",
        "Batch Generation",
        ToolCategory::Enterprise,
        ToolFamily::Variation,
        "Generate shots for 100 products in one run",
    ),
    tool(
        "ad-check",
        "Pre-Launch Check",
        ToolCategory::Enterprise,
        ToolFamily::Variation,
        "Screen images before ad placement",
    ),
    // Custom
    tool(
        "flat-3d",
        "Flat To 3D",
        ToolCategory::Custom,
        ToolFamily::Variation,
        "Turn a flat-lay garment photo into a 3D shot",
    ),
    tool(
        "bg-swap-product",
        "Product Background Swap",
        ToolCategory::Custom,
        ToolFamily::BackgroundSwap,
        "Place a product photo into a realistic scene",
    ),
    tool(
        "remove-watermark",
        "Watermark Removal",
        ToolCategory::Custom,
        ToolFamily::WatermarkRemoval,
        "Remove watermarks and overlaid text in one step",
    ),
    tool(
        "details",
        "Garment Details",
        ToolCategory::Custom,
        ToolFamily::Variation,
        "Generate zoomed detail shots from a garment photo",
    ),
    hot(tool(
        "extract",
        "Product Extraction",
        ToolCategory::Custom,
        ToolFamily::Variation,
        "Extract a flat product shot from any photo",
    )),
    new_tool(tool(
        "lifestyle",
        "Lifestyle Shots",
        ToolCategory::Custom,
        ToolFamily::Variation,
        "Same outfit, new model, scene and pose",
    )),
];

/// Looks up a tool by id.
pub fn find_tool(id: &str) -> Option<&'static Tool> {
    TOOLS.iter().find(|t| t.id == id)
}

/// All tools in a category, preserving catalog order.
pub fn tools_in(category: ToolCategory) -> impl Iterator<Item = &'static Tool> {
    TOOLS.iter().filter(move |t| t.category == category)
}

/// A labeled group of prompt tags.
#[derive(Debug, Clone, Copy)]
pub struct TagGroup {
    /// Group label.
    pub label: &'static str,
    /// Tags appended verbatim to the prompt.
    pub tags: &'static [&'static str],
}

/// Prompt tag groups shown under the prompt field.
pub static TAG_GROUPS: &[TagGroup] = &[
    TagGroup {
        label: "Subject",
        tags: &["model", "woman", "man", "girl", "boy"],
    },
    TagGroup {
        label: "Action",
        tags: &[
            "looking up into the distance",
            "walking toward the camera",
            "hands in both pockets",
            "standing with back to the camera",
            "left hand in pocket",
            "left hand touching the chin",
            "glancing back over the shoulder",
        ],
    },
];

/// Clickable sample images, fetched and re-encoded like uploads.
pub static SAMPLE_IMAGES: &[&str] = &[
    "https://picsum.photos/id/64/400/400",
    "https://picsum.photos/id/177/400/400",
    "https://picsum.photos/id/338/400/400",
    "https://picsum.photos/id/823/400/400",
    "https://picsum.photos/id/1027/400/400",
];

/// Id of the free-text background preset.
pub const CUSTOM_PRESET_ID: &str = "custom";

/// A pre-authored background description selectable in place of free text.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundPreset {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Fixed scene description. Empty for the custom preset, which defers to
    /// user text.
    pub prompt: &'static str,
}

/// Background presets for the product background-swap tool.
pub static BACKGROUND_PRESETS: &[BackgroundPreset] = &[
    BackgroundPreset {
        id: "studio-white",
        name: "White Studio",
        prompt: "a seamless white studio backdrop with soft, even lighting",
    },
    BackgroundPreset {
        id: "marble-table",
        name: "Marble Tabletop",
        prompt: "a polished marble tabletop with soft window light from the left",
    },
    BackgroundPreset {
        id: "beach",
        name: "Sunlit Beach",
        prompt: "warm sand at a sunlit beach, gentle waves blurred in the background",
    },
    BackgroundPreset {
        id: "forest-floor",
        name: "Forest Floor",
        prompt: "a mossy forest floor with dappled sunlight filtering through leaves",
    },
    BackgroundPreset {
        id: "city-dusk",
        name: "City At Dusk",
        prompt: "a blurred city street at dusk with warm bokeh lights",
    },
    BackgroundPreset {
        id: CUSTOM_PRESET_ID,
        name: "Custom",
        prompt: "",
    },
];

/// Looks up a background preset by id.
pub fn find_preset(id: &str) -> Option<&'static BackgroundPreset> {
    BACKGROUND_PRESETS.iter().find(|p| p.id == id)
}

/// A product-type label giving the service context for background swaps.
#[derive(Debug, Clone, Copy)]
pub struct ProductCategory {
    /// Stable identifier.
    pub id: &'static str,
    /// Label interpolated into the instruction text.
    pub label: &'static str,
}

/// Product categories for the background-swap tool.
pub static PRODUCT_CATEGORIES: &[ProductCategory] = &[
    ProductCategory {
        id: "shoes",
        label: "pair of shoes",
    },
    ProductCategory {
        id: "handbag",
        label: "handbag",
    },
    ProductCategory {
        id: "clothing",
        label: "piece of clothing",
    },
    ProductCategory {
        id: "cosmetics",
        label: "cosmetics product",
    },
    ProductCategory {
        id: "jewelry",
        label: "piece of jewelry",
    },
    ProductCategory {
        id: "electronics",
        label: "electronic device",
    },
];

/// Looks up a product category by id.
pub fn find_category(id: &str) -> Option<&'static ProductCategory> {
    PRODUCT_CATEGORIES.iter().find(|c| c.id == id)
}
