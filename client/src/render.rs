use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use mapview_shared::{Color, ImagePlacement, Point, Rect, RenderSurface};

/// Canvas 2D backend for the viewer's render pass.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: Option<HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            image: None,
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    pub fn set_image(&mut self, image: HtmlImageElement) {
        self.image = Some(image);
    }
}

impl RenderSurface for CanvasSurface {
    fn clear(&mut self, rect: Rect) {
        self.ctx.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn draw_image(&mut self, placement: ImagePlacement) {
        let Some(image) = &self.image else {
            return;
        };
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            placement.x,
            placement.y,
            placement.width * placement.scale,
            placement.height * placement.scale,
        );
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.ctx;
        // Resizing the canvas resets context state, so set caps on every stroke.
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(width);
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for point in rest {
            ctx.line_to(point.x, point.y);
        }
        ctx.stroke();
    }
}
