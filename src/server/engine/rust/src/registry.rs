/* src/server/engine/rust/src/registry.rs */

//! Static page/section registry: the single source of truth for which pages
//! and sections exist and can be hidden.

use std::collections::HashSet;

use crate::locale::Locale;

/// Trilingual label baked into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticLabel {
  pub zh_cn: &'static str,
  pub zh_tw: &'static str,
  pub en: &'static str,
}

impl StaticLabel {
  pub fn get(&self, locale: Locale) -> &'static str {
    match locale {
      Locale::ZhCn => self.zh_cn,
      Locale::ZhTw => self.zh_tw,
      Locale::En => self.en,
    }
  }
}

/// How a page is matched against a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
  /// Path must equal the route exactly.
  Exact(&'static str),
  /// Path must start with the prefix and carry at least one more segment.
  Prefix(&'static str),
}

impl RouteMatch {
  pub fn pattern(&self) -> &'static str {
    match self {
      Self::Exact(p) | Self::Prefix(p) => p,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDefinition {
  pub key: &'static str,
  pub label: StaticLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefinition {
  pub key: &'static str,
  pub label: StaticLabel,
  pub route: RouteMatch,
  /// Exact number of non-empty path segments required, if set.
  pub segment_depth: Option<usize>,
  pub sections: &'static [SectionDefinition],
}

impl PageDefinition {
  pub fn section_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.sections.iter().map(|s| s.key)
  }

  pub fn has_section(&self, key: &str) -> bool {
    self.sections.iter().any(|s| s.key == key)
  }
}

const fn label(zh_cn: &'static str, zh_tw: &'static str, en: &'static str) -> StaticLabel {
  StaticLabel { zh_cn, zh_tw, en }
}

const fn section(key: &'static str, label: StaticLabel) -> SectionDefinition {
  SectionDefinition { key, label }
}

// -- Built-in pages --

pub const REGISTRY: &[PageDefinition] = &[
  PageDefinition {
    key: "home",
    label: label("首页", "首頁", "Home"),
    route: RouteMatch::Exact("/"),
    segment_depth: None,
    sections: &[
      section("hero", label("首屏横幅", "首屏橫幅", "Hero banner")),
      section("highlights", label("核心优势", "核心優勢", "Highlights")),
      section("featuredProducts", label("推荐产品", "推薦產品", "Featured products")),
      section("featuredCases", label("精选案例", "精選案例", "Featured cases")),
      section("clients", label("合作客户", "合作客戶", "Clients")),
      section("latestNews", label("最新动态", "最新動態", "Latest news")),
      section("cta", label("询价引导", "詢價引導", "Call to action")),
    ],
  },
  PageDefinition {
    key: "about",
    label: label("关于我们", "關於我們", "About us"),
    route: RouteMatch::Exact("/about"),
    segment_depth: None,
    sections: &[
      section("hero", label("首屏横幅", "首屏橫幅", "Hero banner")),
      section("story", label("品牌故事", "品牌故事", "Our story")),
      section("timeline", label("发展历程", "發展歷程", "Timeline")),
      section("factory", label("生产基地", "生產基地", "Factory")),
      section("certifications", label("资质认证", "資質認證", "Certifications")),
    ],
  },
  PageDefinition {
    key: "products",
    label: label("产品中心", "產品中心", "Products"),
    route: RouteMatch::Exact("/products"),
    segment_depth: Some(1),
    sections: &[
      section("hero", label("首屏横幅", "首屏橫幅", "Hero banner")),
      section("categories", label("产品分类", "產品分類", "Categories")),
      section("grid", label("产品列表", "產品列表", "Product grid")),
      section("cta", label("询价引导", "詢價引導", "Call to action")),
    ],
  },
  PageDefinition {
    key: "productDetail",
    label: label("产品详情", "產品詳情", "Product detail"),
    route: RouteMatch::Prefix("/products/"),
    segment_depth: Some(2),
    sections: &[
      section("gallery", label("图片画廊", "圖片畫廊", "Gallery")),
      section("specs", label("技术参数", "技術參數", "Specifications")),
      section("applications", label("应用场景", "應用場景", "Applications")),
      section("downloads", label("资料下载", "資料下載", "Downloads")),
      section("relatedProducts", label("相关产品", "相關產品", "Related products")),
      section("inquiry", label("在线询价", "線上詢價", "Inquiry form")),
    ],
  },
  PageDefinition {
    key: "cases",
    label: label("工程案例", "工程案例", "Cases"),
    route: RouteMatch::Exact("/cases"),
    segment_depth: Some(1),
    sections: &[
      section("hero", label("首屏横幅", "首屏橫幅", "Hero banner")),
      section("categories", label("案例分类", "案例分類", "Categories")),
      section("grid", label("案例列表", "案例列表", "Case grid")),
    ],
  },
  PageDefinition {
    key: "casesCategory",
    label: label("案例分类", "案例分類", "Case category"),
    route: RouteMatch::Prefix("/cases/"),
    segment_depth: Some(2),
    sections: &[
      section("intro", label("分类简介", "分類簡介", "Introduction")),
      section("grid", label("案例列表", "案例列表", "Case grid")),
      section("sidebar", label("侧边栏", "側邊欄", "Sidebar")),
    ],
  },
  PageDefinition {
    key: "casesDetail",
    label: label("案例详情", "案例詳情", "Case detail"),
    route: RouteMatch::Prefix("/cases/"),
    segment_depth: Some(3),
    sections: &[
      section("gallery", label("图片画廊", "圖片畫廊", "Gallery")),
      section("overview", label("项目概况", "項目概況", "Overview")),
      section("productsUsed", label("所用产品", "所用產品", "Products used")),
      section("relatedCases", label("相关案例", "相關案例", "Related cases")),
      section("sidebar", label("侧边栏", "側邊欄", "Sidebar")),
    ],
  },
  PageDefinition {
    key: "news",
    label: label("新闻资讯", "新聞資訊", "News"),
    route: RouteMatch::Exact("/news"),
    segment_depth: Some(1),
    sections: &[
      section("hero", label("首屏横幅", "首屏橫幅", "Hero banner")),
      section("list", label("新闻列表", "新聞列表", "Article list")),
      section("sidebar", label("侧边栏", "側邊欄", "Sidebar")),
    ],
  },
  PageDefinition {
    key: "newsDetail",
    label: label("新闻详情", "新聞詳情", "News article"),
    route: RouteMatch::Prefix("/news/"),
    segment_depth: Some(2),
    sections: &[
      section("body", label("正文", "正文", "Article body")),
      section("related", label("相关新闻", "相關新聞", "Related articles")),
      section("sidebar", label("侧边栏", "側邊欄", "Sidebar")),
    ],
  },
  PageDefinition {
    key: "solutions",
    label: label("解决方案", "解決方案", "Solutions"),
    route: RouteMatch::Exact("/solutions"),
    segment_depth: None,
    sections: &[
      section("hero", label("首屏横幅", "首屏橫幅", "Hero banner")),
      section("industries", label("行业方案", "行業方案", "Industries")),
      section("process", label("服务流程", "服務流程", "Process")),
      section("cta", label("询价引导", "詢價引導", "Call to action")),
    ],
  },
  PageDefinition {
    key: "contact",
    label: label("联系我们", "聯絡我們", "Contact"),
    route: RouteMatch::Exact("/contact"),
    segment_depth: None,
    sections: &[
      section("form", label("留言表单", "留言表單", "Contact form")),
      section("offices", label("办公地址", "辦公地址", "Offices")),
      section("map", label("地图", "地圖", "Map")),
    ],
  },
  PageDefinition {
    key: "quote",
    label: label("在线询价", "線上詢價", "Request a quote"),
    route: RouteMatch::Exact("/quote"),
    segment_depth: None,
    sections: &[
      section("form", label("询价表单", "詢價表單", "Quote form")),
      section("faq", label("常见问题", "常見問題", "FAQ")),
    ],
  },
  PageDefinition {
    key: "privacy",
    label: label("隐私政策", "隱私政策", "Privacy policy"),
    route: RouteMatch::Exact("/privacy"),
    segment_depth: None,
    sections: &[],
  },
  PageDefinition {
    key: "terms",
    label: label("使用条款", "使用條款", "Terms of use"),
    route: RouteMatch::Exact("/terms"),
    segment_depth: None,
    sections: &[],
  },
];

pub fn find_page(key: &str) -> Option<&'static PageDefinition> {
  REGISTRY.iter().find(|p| p.key == key)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
  #[error("duplicate page key \"{0}\"")]
  DuplicatePage(&'static str),
  #[error("page \"{page}\" declares section \"{section}\" twice")]
  DuplicateSection { page: &'static str, section: &'static str },
  #[error("page \"{page}\" route \"{route}\" must start with '/'")]
  RouteNotAbsolute { page: &'static str, route: &'static str },
  #[error("page \"{page}\" prefix \"{prefix}\" must end with '/'")]
  PrefixWithoutSlash { page: &'static str, prefix: &'static str },
}

/// Check key uniqueness and route shape for a registry slice.
pub fn validate_registry(pages: &[PageDefinition]) -> Result<(), RegistryError> {
  let mut seen = HashSet::new();
  for page in pages {
    if !seen.insert(page.key) {
      return Err(RegistryError::DuplicatePage(page.key));
    }
    let pattern = page.route.pattern();
    if !pattern.starts_with('/') {
      return Err(RegistryError::RouteNotAbsolute { page: page.key, route: pattern });
    }
    if let RouteMatch::Prefix(prefix) = page.route
      && !prefix.ends_with('/')
    {
      return Err(RegistryError::PrefixWithoutSlash { page: page.key, prefix });
    }
    let mut sections = HashSet::new();
    for s in page.sections {
      if !sections.insert(s.key) {
        return Err(RegistryError::DuplicateSection { page: page.key, section: s.key });
      }
    }
  }
  Ok(())
}
