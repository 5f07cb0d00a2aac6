use std::path::PathBuf;

/// Display text. Defaults are the Portuguese labels of the original dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub sidebar_header: &'static str,
    pub region_filter: &'static str,
    pub category_filter: &'static str,
    pub kpi_heading: &'static str,
    pub total_profit: &'static str,
    pub total_sales: &'static str,
    pub average_sale: &'static str,
    pub profit_by_category: &'static str,
    pub profit_by_region: &'static str,
    pub profit_over_time: &'static str,
    pub sales_by_category: &'static str,
    pub ship_modes: &'static str,
    pub category_axis: &'static str,
    pub region_axis: &'static str,
    pub profit_axis: &'static str,
    pub sales_axis: &'static str,
    pub month_axis: &'static str,
    pub year_legend: &'static str,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            sidebar_header: "Filtros",
            region_filter: "Região",
            category_filter: "Categoria",
            kpi_heading: "KPIs",
            total_profit: "Lucro Total",
            total_sales: "Vendas Totais",
            average_sale: "Preço Médio por Venda",
            profit_by_category: "Lucro por Categoria",
            profit_by_region: "Lucro por Regiâo",
            profit_over_time: "Lucro Anual",
            sales_by_category: "Vendas por Categoria",
            ship_modes: "Método de Envio",
            category_axis: "Categoria",
            region_axis: "Região",
            profit_axis: "Lucro",
            sales_axis: "Vendas",
            month_axis: "Mês",
            year_legend: "Ano",
        }
    }
}

/// Compiled-in dashboard settings. There are no flags or config files.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Source dataset, relative to the working directory.
    pub data_path: PathBuf,
    pub window_title: &'static str,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
    /// Shown in place of a KPI that cannot be computed.
    pub placeholder: &'static str,
    /// Inner radius of the pie charts as a fraction of the outer radius.
    pub pie_hole: f32,
    pub labels: Labels,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("kpi.csv"),
            window_title: "Sales Dashboard",
            inner_size: [1280.0, 900.0],
            min_inner_size: [800.0, 600.0],
            placeholder: "N/A",
            pie_hole: 0.2,
            labels: Labels::default(),
        }
    }
}
