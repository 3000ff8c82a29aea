// Source fixtures with known comment layouts and expected conversions

/// C header mixing block, line and member comments
pub const C_HEADER: &str = r#"#ifndef GEOMETRY_H
#define GEOMETRY_H

/* Point in the plane.
 * Coordinates are in pixels. */
struct point {
    int x; ///< horizontal
    int y; ///< vertical
};

// Distance between two points.
//
// Returns a non-negative value.
double distance(struct point a, struct point b);

/** Already documented. */
int area(int w, int h);

#endif
"#;

/// C_HEADER normalized to javadoc blocks; member comments keep their style
pub const C_HEADER_JAVADOC: &str = r#"#ifndef GEOMETRY_H
#define GEOMETRY_H

/**
 * Point in the plane.
 * Coordinates are in pixels.
 */
struct point {
    int x; ///< horizontal
    int y; ///< vertical
};

/**
 * Distance between two points.
 *
 * Returns a non-negative value.
 */
double distance(struct point a, struct point b);

/**
 * Already documented.
 */
int area(int w, int h);

#endif
"#;

/// C++ class with Doxygen commands and one plain comment on a method
pub const CPP_SHAPE: &str = r#"namespace gfx {

/// \brief A drawable shape.
class Shape {
public:
    /// \brief Creates a shape.
    explicit Shape(int sides);

    // Draws the shape.
    void draw() const;

    int sides; //!< number of sides
};

}  // namespace gfx
"#;

/// Backend answer wrapped in chatter, with a block comment
pub const DRAW_RESPONSE: &str = "Here you go:\n/**\n * @brief Draws the shape.\n */\nLet me know if you need more.";

/// What the generated comment for `draw` renders to at class-body indentation
pub const DRAW_GENERATED: &str = "/**\n     * AI_GENERATED\n     * \\brief Draws the shape.\n     */";
