use super::Rgb;

/// The CSS named colors, alphabetical. Where names share a value the first
/// one in this order is the canonical name.
pub const CSS_COLORS: [(&str, Rgb); 148] = [
    ("aliceblue", Rgb::new(240, 248, 255)),
    ("antiquewhite", Rgb::new(250, 235, 215)),
    ("aqua", Rgb::new(0, 255, 255)),
    ("aquamarine", Rgb::new(127, 255, 212)),
    ("azure", Rgb::new(240, 255, 255)),
    ("beige", Rgb::new(245, 245, 220)),
    ("bisque", Rgb::new(255, 228, 196)),
    ("black", Rgb::new(0, 0, 0)),
    ("blanchedalmond", Rgb::new(255, 235, 205)),
    ("blue", Rgb::new(0, 0, 255)),
    ("blueviolet", Rgb::new(138, 43, 226)),
    ("brown", Rgb::new(165, 42, 42)),
    ("burlywood", Rgb::new(222, 184, 135)),
    ("cadetblue", Rgb::new(95, 158, 160)),
    ("chartreuse", Rgb::new(127, 255, 0)),
    ("chocolate", Rgb::new(210, 105, 30)),
    ("coral", Rgb::new(255, 127, 80)),
    ("cornflowerblue", Rgb::new(100, 149, 237)),
    ("cornsilk", Rgb::new(255, 248, 220)),
    ("crimson", Rgb::new(220, 20, 60)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("darkblue", Rgb::new(0, 0, 139)),
    ("darkcyan", Rgb::new(0, 139, 139)),
    ("darkgoldenrod", Rgb::new(184, 134, 11)),
    ("darkgray", Rgb::new(169, 169, 169)),
    ("darkgreen", Rgb::new(0, 100, 0)),
    ("darkgrey", Rgb::new(169, 169, 169)),
    ("darkkhaki", Rgb::new(189, 183, 107)),
    ("darkmagenta", Rgb::new(139, 0, 139)),
    ("darkolivegreen", Rgb::new(85, 107, 47)),
    ("darkorange", Rgb::new(255, 140, 0)),
    ("darkorchid", Rgb::new(153, 50, 204)),
    ("darkred", Rgb::new(139, 0, 0)),
    ("darksalmon", Rgb::new(233, 150, 122)),
    ("darkseagreen", Rgb::new(143, 188, 143)),
    ("darkslateblue", Rgb::new(72, 61, 139)),
    ("darkslategray", Rgb::new(47, 79, 79)),
    ("darkslategrey", Rgb::new(47, 79, 79)),
    ("darkturquoise", Rgb::new(0, 206, 209)),
    ("darkviolet", Rgb::new(148, 0, 211)),
    ("deeppink", Rgb::new(255, 20, 147)),
    ("deepskyblue", Rgb::new(0, 191, 255)),
    ("dimgray", Rgb::new(105, 105, 105)),
    ("dimgrey", Rgb::new(105, 105, 105)),
    ("dodgerblue", Rgb::new(30, 144, 255)),
    ("firebrick", Rgb::new(178, 34, 34)),
    ("floralwhite", Rgb::new(255, 250, 240)),
    ("forestgreen", Rgb::new(34, 139, 34)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("gainsboro", Rgb::new(220, 220, 220)),
    ("ghostwhite", Rgb::new(248, 248, 255)),
    ("gold", Rgb::new(255, 215, 0)),
    ("goldenrod", Rgb::new(218, 165, 32)),
    ("gray", Rgb::new(128, 128, 128)),
    ("green", Rgb::new(0, 128, 0)),
    ("greenyellow", Rgb::new(173, 255, 47)),
    ("grey", Rgb::new(128, 128, 128)),
    ("honeydew", Rgb::new(240, 255, 240)),
    ("hotpink", Rgb::new(255, 105, 180)),
    ("indianred", Rgb::new(205, 92, 92)),
    ("indigo", Rgb::new(75, 0, 130)),
    ("ivory", Rgb::new(255, 255, 240)),
    ("khaki", Rgb::new(240, 230, 140)),
    ("lavender", Rgb::new(230, 230, 250)),
    ("lavenderblush", Rgb::new(255, 240, 245)),
    ("lawngreen", Rgb::new(124, 252, 0)),
    ("lemonchiffon", Rgb::new(255, 250, 205)),
    ("lightblue", Rgb::new(173, 216, 230)),
    ("lightcoral", Rgb::new(240, 128, 128)),
    ("lightcyan", Rgb::new(224, 255, 255)),
    ("lightgoldenrodyellow", Rgb::new(250, 250, 210)),
    ("lightgray", Rgb::new(211, 211, 211)),
    ("lightgreen", Rgb::new(144, 238, 144)),
    ("lightgrey", Rgb::new(211, 211, 211)),
    ("lightpink", Rgb::new(255, 182, 193)),
    ("lightsalmon", Rgb::new(255, 160, 122)),
    ("lightseagreen", Rgb::new(32, 178, 170)),
    ("lightskyblue", Rgb::new(135, 206, 250)),
    ("lightslategray", Rgb::new(119, 136, 153)),
    ("lightslategrey", Rgb::new(119, 136, 153)),
    ("lightsteelblue", Rgb::new(176, 196, 222)),
    ("lightyellow", Rgb::new(255, 255, 224)),
    ("lime", Rgb::new(0, 255, 0)),
    ("limegreen", Rgb::new(50, 205, 50)),
    ("linen", Rgb::new(250, 240, 230)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("mediumaquamarine", Rgb::new(102, 205, 170)),
    ("mediumblue", Rgb::new(0, 0, 205)),
    ("mediumorchid", Rgb::new(186, 85, 211)),
    ("mediumpurple", Rgb::new(147, 112, 219)),
    ("mediumseagreen", Rgb::new(60, 179, 113)),
    ("mediumslateblue", Rgb::new(123, 104, 238)),
    ("mediumspringgreen", Rgb::new(0, 250, 154)),
    ("mediumturquoise", Rgb::new(72, 209, 204)),
    ("mediumvioletred", Rgb::new(199, 21, 133)),
    ("midnightblue", Rgb::new(25, 25, 112)),
    ("mintcream", Rgb::new(245, 255, 250)),
    ("mistyrose", Rgb::new(255, 228, 225)),
    ("moccasin", Rgb::new(255, 228, 181)),
    ("navajowhite", Rgb::new(255, 222, 173)),
    ("navy", Rgb::new(0, 0, 128)),
    ("oldlace", Rgb::new(253, 245, 230)),
    ("olive", Rgb::new(128, 128, 0)),
    ("olivedrab", Rgb::new(107, 142, 35)),
    ("orange", Rgb::new(255, 165, 0)),
    ("orangered", Rgb::new(255, 69, 0)),
    ("orchid", Rgb::new(218, 112, 214)),
    ("palegoldenrod", Rgb::new(238, 232, 170)),
    ("palegreen", Rgb::new(152, 251, 152)),
    ("paleturquoise", Rgb::new(175, 238, 238)),
    ("palevioletred", Rgb::new(219, 112, 147)),
    ("papayawhip", Rgb::new(255, 239, 213)),
    ("peachpuff", Rgb::new(255, 218, 185)),
    ("peru", Rgb::new(205, 133, 63)),
    ("pink", Rgb::new(255, 192, 203)),
    ("plum", Rgb::new(221, 160, 221)),
    ("powderblue", Rgb::new(176, 224, 230)),
    ("purple", Rgb::new(128, 0, 128)),
    ("rebeccapurple", Rgb::new(102, 51, 153)),
    ("red", Rgb::new(255, 0, 0)),
    ("rosybrown", Rgb::new(188, 143, 143)),
    ("royalblue", Rgb::new(65, 105, 225)),
    ("saddlebrown", Rgb::new(139, 69, 19)),
    ("salmon", Rgb::new(250, 128, 114)),
    ("sandybrown", Rgb::new(244, 164, 96)),
    ("seagreen", Rgb::new(46, 139, 87)),
    ("seashell", Rgb::new(255, 245, 238)),
    ("sienna", Rgb::new(160, 82, 45)),
    ("silver", Rgb::new(192, 192, 192)),
    ("skyblue", Rgb::new(135, 206, 235)),
    ("slateblue", Rgb::new(106, 90, 205)),
    ("slategray", Rgb::new(112, 128, 144)),
    ("slategrey", Rgb::new(112, 128, 144)),
    ("snow", Rgb::new(255, 250, 250)),
    ("springgreen", Rgb::new(0, 255, 127)),
    ("steelblue", Rgb::new(70, 130, 180)),
    ("tan", Rgb::new(210, 180, 140)),
    ("teal", Rgb::new(0, 128, 128)),
    ("thistle", Rgb::new(216, 191, 216)),
    ("tomato", Rgb::new(255, 99, 71)),
    ("turquoise", Rgb::new(64, 224, 208)),
    ("violet", Rgb::new(238, 130, 238)),
    ("wheat", Rgb::new(245, 222, 179)),
    ("white", Rgb::new(255, 255, 255)),
    ("whitesmoke", Rgb::new(245, 245, 245)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("yellowgreen", Rgb::new(154, 205, 50)),
];
