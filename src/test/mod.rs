mod syn_params;
